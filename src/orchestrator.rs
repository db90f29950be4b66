//! Update orchestrator for coordinating the entire update workflow
//!
//! This module provides:
//! - Workflow coordination: fetch version → locate manifests → compare → patch → report
//! - Force-update and release-URL mode support
//! - Error handling with per-manifest continuation

use crate::config::{AppConfig, RunOptions};
use crate::error::AppError;
use crate::manifest::{
    detect_manifests, read_current_version, ManifestInfo, ManifestPatcher, PatchOutcome,
};
use crate::output::GithubOutput;
use crate::remote::{HttpClient, RemoteSource};
use crate::update::{fetch_latest_version, UpdateJudge, UrlStrategy};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    /// Application configuration
    config: AppConfig,
    /// CI toggles
    options: RunOptions,
    /// Directory manifests are looked up in
    root: PathBuf,
    /// Network access for the version page and artifacts
    remote: Box<dyn RemoteSource>,
    /// How new download URLs are built
    strategy: UrlStrategy,
    /// Results channel
    output: GithubOutput,
}

/// A manifest that needed an update but could not be patched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFailure {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Why the patch failed
    pub message: String,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Version fetched from upstream
    pub latest_version: String,
    /// Every manifest that was found
    pub manifests: Vec<ManifestInfo>,
    /// Number of manifests that needed an update
    pub pending: usize,
    /// Manifests that were patched
    pub updated: Vec<PatchOutcome>,
    /// Manifests that needed an update but failed
    pub failed: Vec<ManifestFailure>,
}

impl RunReport {
    /// Returns true if any manifest file was rewritten
    pub fn has_changes(&self) -> bool {
        !self.updated.is_empty()
    }
}

impl Orchestrator {
    /// Create a new orchestrator backed by a real HTTP client
    pub fn new(
        config: AppConfig,
        options: RunOptions,
        root: impl Into<PathBuf>,
    ) -> Result<Self, AppError> {
        let client = HttpClient::with_timeout(config.timeout)?;
        Self::with_remote(config, options, root, Box::new(client))
    }

    /// Create an orchestrator with a custom remote (for testing)
    pub fn with_remote(
        config: AppConfig,
        options: RunOptions,
        root: impl Into<PathBuf>,
        remote: Box<dyn RemoteSource>,
    ) -> Result<Self, AppError> {
        let strategy = UrlStrategy::select(&config, &options)?;
        let output = GithubOutput::new(options.github_output.clone());

        Ok(Self {
            config,
            options,
            root: root.into(),
            remote,
            strategy,
            output,
        })
    }

    /// Run the update workflow
    ///
    /// Fails if the latest version cannot be fetched, if no manifest exists,
    /// or if every manifest that needed an update failed to be patched.
    pub async fn run(&self) -> Result<RunReport, AppError> {
        info!(app = %self.config.name, "checking for updates");

        // Step 1: Fetch the latest version
        let latest_version = fetch_latest_version(
            &*self.remote,
            &self.config.version_url,
            &self.config.version_pattern,
        )
        .await?;
        info!(version = %latest_version, "latest version");

        // Step 2: Locate manifests
        let manifests = detect_manifests(&self.root, &self.config.manifest_name);
        if manifests.is_empty() {
            return Err(AppError::NoManifests {
                root: self.root.clone(),
            });
        }
        info!(count = manifests.len(), "manifests found");

        // Step 3: Compare versions
        let judge = UpdateJudge::new(&latest_version, self.options.force_update);
        let pending: Vec<&ManifestInfo> = manifests
            .iter()
            .filter(|manifest| {
                let current = read_current_version(&manifest.path);
                let decision = judge.judge(current.as_deref());
                info!(
                    path = %manifest,
                    arch_dir = manifest.arch_dir.unwrap_or("-"),
                    %decision,
                    "compared"
                );
                decision.needs_update()
            })
            .collect();

        let mut report = RunReport {
            latest_version: latest_version.clone(),
            manifests: manifests.clone(),
            pending: pending.len(),
            updated: Vec::new(),
            failed: Vec::new(),
        };

        if pending.is_empty() {
            info!(version = %latest_version, "all manifests are up to date");
            return Ok(report);
        }

        // Step 4: Patch each stale manifest independently
        let patcher = ManifestPatcher::new(&*self.remote, &self.strategy);
        for manifest in pending {
            info!(
                path = %manifest,
                arch_dir = manifest.arch_dir.unwrap_or("-"),
                "updating"
            );
            match patcher.patch_file(&manifest.path, &latest_version).await {
                Ok(outcome) => report.updated.push(outcome),
                Err(e) => {
                    warn!(path = %manifest, error = %e, "update failed");
                    report.failed.push(ManifestFailure {
                        path: manifest.path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if !report.has_changes() {
            return Err(AppError::AllUpdatesFailed {
                attempted: report.pending,
            });
        }

        // Step 5: Report
        info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            "update finished"
        );
        self.write_results(&report)?;

        Ok(report)
    }

    /// Publish results for the surrounding CI job
    fn write_results(&self, report: &RunReport) -> Result<(), AppError> {
        let mut entries = vec![("has_changes", "true".to_string())];
        if self.strategy.reports_download_url() {
            entries.push(("new_version", report.latest_version.clone()));
            if let Some(first) = report.updated.first() {
                entries.push(("download_url", first.url.clone()));
            }
        }

        self.output.write(&entries).map_err(|source| AppError::Output {
            path: self.output.path().map(Path::to_path_buf).unwrap_or_default(),
            source,
        })
    }
}
