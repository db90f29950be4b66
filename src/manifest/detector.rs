//! Manifest file detection
//!
//! Manifests live at fixed locations only:
//! - `<root>/<manifest_name>`
//! - `<root>/<arch>/<manifest_name>` for each known architecture directory

use crate::domain::ARCH_DIRS;
use std::fmt;
use std::path::{Path, PathBuf};

/// Information about a detected manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Architecture directory the manifest was found in, if any
    pub arch_dir: Option<&'static str>,
}

impl ManifestInfo {
    /// Create a new ManifestInfo for the root manifest
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            arch_dir: None,
        }
    }

    /// Mark this manifest as belonging to an architecture directory
    pub fn with_arch_dir(mut self, arch_dir: &'static str) -> Self {
        self.arch_dir = Some(arch_dir);
        self
    }
}

impl fmt::Display for ManifestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Detect all manifest files under `root`
///
/// The root manifest comes first, followed by architecture manifests in
/// the order of [`ARCH_DIRS`].
pub fn detect_manifests(root: &Path, manifest_name: &str) -> Vec<ManifestInfo> {
    let mut manifests = Vec::new();

    let root_manifest = root.join(manifest_name);
    if root_manifest.is_file() {
        manifests.push(ManifestInfo::new(root_manifest));
    }

    for &arch_dir in ARCH_DIRS {
        let arch_manifest = root.join(arch_dir).join(manifest_name);
        if arch_manifest.is_file() {
            manifests.push(ManifestInfo::new(arch_manifest).with_arch_dir(arch_dir));
        }
    }

    manifests
}
