//! Download URL construction
//!
//! Two mutually exclusive modes:
//! - Template: `{version}`/`{arch}` substituted into the configured template
//! - Release: a caller-supplied release asset URL, arch-swapped when it has
//!   no `{arch}` placeholder and routed through an optional mirror prefix

use crate::config::{AppConfig, RunOptions};
use crate::domain::Arch;
use crate::error::{ConfigError, PatchError};
use regex::Regex;
use std::sync::LazyLock;

/// Any placeholder left after substitution
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^{}]*\}").unwrap());

/// How new download URLs are derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlStrategy {
    /// Substitute into the config's download URL template
    Template { template: String },
    /// Substitute into an explicit release asset URL
    Release {
        url: String,
        /// Prepended unless already present; `None` leaves URLs untouched
        mirror_prefix: Option<String>,
    },
}

impl UrlStrategy {
    /// Select the strategy for this run
    pub fn select(config: &AppConfig, options: &RunOptions) -> Result<Self, ConfigError> {
        if options.use_release_url {
            let url = options
                .release_url
                .clone()
                .ok_or(ConfigError::MissingReleaseUrl)?;
            return Ok(UrlStrategy::Release {
                url,
                mirror_prefix: config.mirror_prefix.clone(),
            });
        }

        if config.download_url_template.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "download_url_template",
            });
        }
        Ok(UrlStrategy::Template {
            template: config.download_url_template.clone(),
        })
    }

    /// Whether the results channel should carry the version and URL
    pub fn reports_download_url(&self) -> bool {
        matches!(self, UrlStrategy::Template { .. })
    }

    /// Build the download URL for `version` on `arch`
    pub fn build_url(&self, version: &str, arch: Arch) -> Result<String, PatchError> {
        match self {
            UrlStrategy::Template { template } => substitute(template, version, arch),
            UrlStrategy::Release { url, mirror_prefix } => {
                let mut built = if url.contains("{arch}") {
                    substitute(url, version, arch)?
                } else {
                    swap_arch(&substitute(url, version, arch)?, arch)
                };
                if let Some(prefix) = mirror_prefix {
                    if !built.starts_with(prefix.as_str()) {
                        built = format!("{}{}", prefix, built);
                    }
                }
                Ok(built)
            }
        }
    }
}

fn substitute(template: &str, version: &str, arch: Arch) -> Result<String, PatchError> {
    let url = template
        .replace("{version}", version)
        .replace("{arch}", arch.as_str());

    if let Some(leftover) = PLACEHOLDER_RE.find(&url) {
        return Err(PatchError::UrlConstruction {
            template: template.to_string(),
            message: format!("unknown placeholder {}", leftover.as_str()),
        });
    }
    if url.trim().is_empty() {
        return Err(PatchError::UrlConstruction {
            template: template.to_string(),
            message: "empty URL".to_string(),
        });
    }
    Ok(url)
}

/// Point a literal amd64/arm64 URL at `arch`
fn swap_arch(url: &str, arch: Arch) -> String {
    let other = arch.other();
    if url.contains(other.as_str()) {
        url.replace(other.as_str(), arch.as_str())
    } else {
        url.to_string()
    }
}
