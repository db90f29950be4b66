//! Manifest file detection, parsing and patching
//!
//! This module provides functionality to:
//! - Detect linglong.yaml files at the root and in architecture directories
//! - Load a manifest as a structure-preserving YAML document
//! - Patch the first updatable source entry to a new version

mod detector;
mod document;
mod patcher;

pub use detector::{detect_manifests, ManifestInfo};
pub use document::{ManifestDocument, SourceEntry, SourceUpdate};
pub use patcher::{ManifestPatcher, PatchOutcome};

use std::path::Path;
use tracing::{debug, warn};

/// Read the version a manifest currently references
///
/// Unreadable manifests yield `None`; the reason is logged.
pub fn read_current_version(path: &Path) -> Option<String> {
    match ManifestDocument::load(path) {
        Ok(doc) => {
            let version = doc.current_version();
            debug!(path = %path.display(), version = ?version, "current version");
            version
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read current version");
            None
        }
    }
}
