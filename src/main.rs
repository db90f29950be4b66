//! linglong-bump - upstream release checker for linglong package manifests
//!
//! Exit status is 0 on success (including when nothing needed updating)
//! and 1 on any failure.

use anyhow::Context;
use clap::Parser;
use linglong_bump::cli::CliArgs;
use linglong_bump::config::{AppConfig, RunOptions};
use linglong_bump::orchestrator::Orchestrator;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            if let Some(hint) = CliArgs::usage_hint(&e) {
                eprintln!("\n{}", hint);
            }
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(args.log_filter());

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load(&args.config)
        .with_context(|| format!("cannot load config {}", args.config.display()))?;
    let options = RunOptions::from_env().with_force(args.force);

    if options.force_update {
        info!("force update enabled");
    }
    if options.use_release_url {
        info!("using release asset URL");
    }

    let orchestrator = Orchestrator::new(config, options, &args.root)?;
    let report = orchestrator.run().await?;

    for failure in &report.failed {
        warn!(path = %failure.path.display(), "not updated: {}", failure.message);
    }
    if report.has_changes() {
        info!(
            "updated {} of {} manifest(s) to {}",
            report.updated.len(),
            report.pending,
            report.latest_version
        );
    } else {
        info!("no changes");
    }

    Ok(ExitCode::SUCCESS)
}
