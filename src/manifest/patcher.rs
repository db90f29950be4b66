//! Manifest patching
//!
//! This module provides:
//! - ManifestPatcher, which bumps the first updatable source entry
//! - Package version normalization and build script file name sync
//! - PatchOutcome describing what was written

use crate::domain::{normalize_version, Arch};
use crate::error::{AppError, PatchError};
use crate::manifest::{ManifestDocument, SourceEntry, SourceUpdate};
use crate::remote::RemoteSource;
use crate::update::UrlStrategy;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of patching one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Index of the source entry that was updated
    pub source_index: usize,
    /// Architecture inferred from the old URL
    pub arch: Arch,
    /// Artifact file name before the update
    pub old_name: String,
    /// Artifact file name after the update
    pub new_name: String,
    /// New download URL
    pub url: String,
    /// SHA-256 of the new artifact
    pub digest: String,
    /// Value written to `package.version`, if the section exists
    pub package_version: Option<String>,
    /// Whether the build script referenced the old file name
    pub build_updated: bool,
}

/// Applies a version bump to manifest documents
pub struct ManifestPatcher<'a> {
    remote: &'a dyn RemoteSource,
    strategy: &'a UrlStrategy,
    today: NaiveDate,
}

impl<'a> ManifestPatcher<'a> {
    /// Create a patcher that stamps versions with today's local date
    pub fn new(remote: &'a dyn RemoteSource, strategy: &'a UrlStrategy) -> Self {
        Self::with_date(remote, strategy, Local::now().date_naive())
    }

    /// Create a patcher with a fixed date (for testing)
    pub fn with_date(
        remote: &'a dyn RemoteSource,
        strategy: &'a UrlStrategy,
        today: NaiveDate,
    ) -> Self {
        Self {
            remote,
            strategy,
            today,
        }
    }

    /// Load, patch and save the manifest at `path`
    pub async fn patch_file(
        &self,
        path: &Path,
        new_version: &str,
    ) -> Result<PatchOutcome, AppError> {
        let mut doc = ManifestDocument::load(path)?;
        let outcome = self.patch(&mut doc, new_version).await?;
        doc.save()?;
        info!(path = %path.display(), "manifest written");
        Ok(outcome)
    }

    /// Patch `doc` in memory
    ///
    /// Only the first source entry that can be fully updated (version found
    /// in its URL, URL built, artifact hashed) is changed; later entries are
    /// left alone.
    pub async fn patch(
        &self,
        doc: &mut ManifestDocument,
        new_version: &str,
    ) -> Result<PatchOutcome, PatchError> {
        let path = doc.path().to_path_buf();

        let mut patched = None;
        for source in doc.sources() {
            if let Some(update) = self.prepare_source(&path, &source, new_version).await {
                patched = Some((source, update));
                break;
            }
        }

        let Some((source, (arch, update))) = patched else {
            warn!(path = %path.display(), "no updatable source entry");
            return Err(PatchError::NoUpdatableSource { path });
        };

        doc.update_source(source.index, &update);
        info!(
            path = %path.display(),
            index = source.index,
            %arch,
            name = %update.name,
            "source entry updated"
        );

        let package_version = normalize_version(new_version, self.today);
        let package_version = if doc.set_package_version(&package_version) {
            info!(path = %path.display(), version = %package_version, "package version updated");
            Some(package_version)
        } else {
            warn!(path = %path.display(), "no package section, version not updated");
            None
        };

        let build_updated = doc.replace_in_build(&source.name, &update.name);
        if build_updated {
            info!(path = %path.display(), name = %update.name, "build script file name synced");
        }

        Ok(PatchOutcome {
            path,
            source_index: source.index,
            arch,
            old_name: source.name,
            new_name: update.name,
            url: update.url,
            digest: update.digest,
            package_version,
            build_updated,
        })
    }

    /// Compute the new values for one source entry, or None to move on
    async fn prepare_source(
        &self,
        path: &Path,
        source: &SourceEntry,
        new_version: &str,
    ) -> Option<(Arch, SourceUpdate)> {
        let index = source.index;
        debug!(
            path = %path.display(),
            index,
            name = %source.name,
            url = %source.url,
            "checking source"
        );

        if source.name.is_empty() || source.url.is_empty() {
            debug!(path = %path.display(), index, "skipping source without name or url");
            return None;
        }

        let Some(current) = source.version() else {
            warn!(path = %path.display(), index, url = %source.url, "no version in source url");
            return None;
        };

        let arch = Arch::from_url(&source.url);
        let url = match self.strategy.build_url(new_version, arch) {
            Ok(url) => url,
            Err(e) => {
                warn!(path = %path.display(), index, error = %e, "skipping source");
                return None;
            }
        };
        let name = source.name.replace(&current, new_version);

        info!(path = %path.display(), index, %arch, %url, "hashing new artifact");
        let digest = match self.remote.sha256(&url).await {
            Ok(digest) => digest,
            Err(e) => {
                warn!(path = %path.display(), index, error = %e, "download failed");
                return None;
            }
        };

        Some((arch, SourceUpdate { name, url, digest }))
    }
}
