//! CLI argument parsing module for linglong-bump

use crate::config::CONFIG_EXAMPLE;
use clap::error::{Error, ErrorKind};
use clap::Parser;
use std::path::PathBuf;

/// Check an upstream release and bump linglong.yaml manifests to it
#[derive(Parser, Debug, Clone)]
#[command(
    name = "linglong-bump",
    version,
    about = "Check an upstream release and bump linglong.yaml manifests to it",
    after_help = CONFIG_EXAMPLE
)]
pub struct CliArgs {
    /// Path to the JSON config file
    pub config: PathBuf,

    /// Directory holding linglong.yaml and the architecture subdirectories
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Update even when manifests already reference the latest version (same as FORCE_UPDATE=true)
    #[arg(long)]
    pub force: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Extra text to print after a parse error
    ///
    /// A wrong argument count gets the config example, like `--help` does.
    pub fn usage_hint(err: &Error) -> Option<&'static str> {
        match err.kind() {
            ErrorKind::MissingRequiredArgument | ErrorKind::UnknownArgument => {
                Some(CONFIG_EXAMPLE)
            }
            _ => None,
        }
    }

    /// Log filter directive for this invocation
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "warn,linglong_bump=debug"
        } else {
            "warn,linglong_bump=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_argument() {
        let args = CliArgs::parse_from(["linglong-bump", "app.json"]);
        assert_eq!(args.config, PathBuf::from("app.json"));
        assert_eq!(args.root, PathBuf::from("."));
        assert!(!args.force);
        assert!(!args.verbose);
    }

    #[test]
    fn test_missing_config_is_error() {
        let err = CliArgs::try_parse_from(["linglong-bump"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_extra_argument_is_error() {
        let err = CliArgs::try_parse_from(["linglong-bump", "a.json", "b.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_root_and_flags() {
        let args = CliArgs::parse_from([
            "linglong-bump",
            "app.json",
            "--root",
            "/work/pkg",
            "--force",
            "-v",
        ]);
        assert_eq!(args.root, PathBuf::from("/work/pkg"));
        assert!(args.force);
        assert!(args.verbose);
    }

    #[test]
    fn test_usage_hint_on_wrong_argument_count() {
        let missing = CliArgs::try_parse_from(["linglong-bump"]).unwrap_err();
        assert_eq!(CliArgs::usage_hint(&missing), Some(CONFIG_EXAMPLE));

        let extra = CliArgs::try_parse_from(["linglong-bump", "a.json", "b.json"]).unwrap_err();
        assert_eq!(CliArgs::usage_hint(&extra), Some(CONFIG_EXAMPLE));
    }

    #[test]
    fn test_usage_hint_not_for_help() {
        let help = CliArgs::try_parse_from(["linglong-bump", "--help"]).unwrap_err();
        assert_eq!(CliArgs::usage_hint(&help), None);
    }

    #[test]
    fn test_log_filter() {
        let args = CliArgs::parse_from(["linglong-bump", "app.json"]);
        assert_eq!(args.log_filter(), "warn,linglong_bump=info");
        let args = CliArgs::parse_from(["linglong-bump", "app.json", "--verbose"]);
        assert_eq!(args.log_filter(), "warn,linglong_bump=debug");
    }

    #[test]
    fn test_help_contains_config_example() {
        let err = CliArgs::try_parse_from(["linglong-bump", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("download_url_template"));
    }
}
