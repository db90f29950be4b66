//! Run configuration
//!
//! This module provides:
//! - AppConfig, loaded once from the JSON config file
//! - RunOptions, the CI toggles read once from the environment

use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Manifest file name used at the root and inside each arch directory
pub const DEFAULT_MANIFEST_NAME: &str = "linglong.yaml";

/// Default connect timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Example printed with the usage text
pub const CONFIG_EXAMPLE: &str = r#"Config example:
{
  "app_name": "Sublime Text",
  "version_url": "https://www.sublimetext.com/download",
  "version_pattern": "Build\\s+(\\d{4})",
  "download_url_template": "https://download.sublimetext.com/sublime-text_build-{version}_{arch}.deb"
}"#;

/// Config file as it appears on disk
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_app_name")]
    app_name: String,
    #[serde(default)]
    version_url: String,
    #[serde(default)]
    version_pattern: String,
    #[serde(default)]
    download_url_template: String,
    #[serde(default)]
    manifest_name: Option<String>,
    #[serde(default)]
    mirror_prefix: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

fn default_app_name() -> String {
    "Unknown App".to_string()
}

/// Validated application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Display name used in log output
    pub name: String,
    /// Page that contains the latest version
    pub version_url: String,
    /// Pattern whose first capture group is the version
    pub version_pattern: Regex,
    /// Download URL with `{version}` and `{arch}` placeholders
    pub download_url_template: String,
    /// Manifest file name
    pub manifest_name: String,
    /// Proxy prefix for release downloads
    ///
    /// Release-URL mode only routes downloads through a mirror when this is
    /// set; with the default of none, release URLs are used as given.
    pub mirror_prefix: Option<String>,
    /// Connect timeout for every request
    pub timeout: Duration,
}

impl AppConfig {
    /// Load and validate the config file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        Self::from_json(&content, path)
    }

    /// Parse and validate config JSON; `path` is only used for error messages
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(content)
            .map_err(|e| ConfigError::parse_error(path, e.to_string()))?;

        if raw.version_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "version_url",
            });
        }
        if raw.version_pattern.is_empty() {
            return Err(ConfigError::MissingField {
                field: "version_pattern",
            });
        }

        let version_pattern =
            Regex::new(&raw.version_pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: raw.version_pattern.clone(),
                message: e.to_string(),
            })?;
        // captures_len counts the implicit whole-match group
        if version_pattern.captures_len() < 2 {
            return Err(ConfigError::PatternWithoutGroup {
                pattern: raw.version_pattern,
            });
        }

        Ok(Self {
            name: raw.app_name,
            version_url: raw.version_url.trim().to_string(),
            version_pattern,
            download_url_template: raw.download_url_template,
            manifest_name: raw
                .manifest_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_MANIFEST_NAME.to_string()),
            mirror_prefix: raw.mirror_prefix.filter(|p| !p.is_empty()),
            timeout: Duration::from_secs(raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

/// Toggles supplied by the surrounding CI job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Patch manifests even when they already carry the latest version
    pub force_update: bool,
    /// Build download URLs from `release_url` instead of the config template
    pub use_release_url: bool,
    /// Release asset URL, optionally containing `{arch}`
    pub release_url: Option<String>,
    /// Append-only key=value results file
    pub github_output: Option<PathBuf>,
}

impl RunOptions {
    /// Read options from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_true = |key: &str| {
            lookup(key)
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            force_update: is_true("FORCE_UPDATE"),
            use_release_url: is_true("USE_GITHUB_URL"),
            release_url: non_empty("GITHUB_RELEASE_URL"),
            github_output: non_empty("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    /// Force an update regardless of the environment (builder pattern)
    pub fn with_force(mut self, force: bool) -> Self {
        self.force_update |= force;
        self
    }
}
