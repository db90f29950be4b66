//! Update judgment logic for manifests
//!
//! This module provides:
//! - Latest-version lookup on the upstream page
//! - Download URL strategies (template or release asset)
//! - Update judgment engine that decides whether a manifest is stale

mod fetcher;
mod strategy;

pub use fetcher::{fetch_latest_version, match_version};
pub use strategy::UrlStrategy;

use std::fmt;

/// Outcome of comparing one manifest against the latest version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Manifest already references the latest version
    UpToDate,
    /// Manifest references an older (or simply different) version
    Stale { current: String },
    /// No version could be read from the manifest
    Unreadable,
    /// Manifest is current but an update was forced
    Forced { current: Option<String> },
}

impl UpdateDecision {
    /// Returns true if the manifest should be patched
    pub fn needs_update(&self) -> bool {
        !matches!(self, UpdateDecision::UpToDate)
    }
}

impl fmt::Display for UpdateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateDecision::UpToDate => write!(f, "up to date"),
            UpdateDecision::Stale { current } => write!(f, "stale (current {})", current),
            UpdateDecision::Unreadable => write!(f, "current version unreadable"),
            UpdateDecision::Forced { .. } => write!(f, "forced update"),
        }
    }
}

/// Update judgment engine that decides whether to patch a manifest
pub struct UpdateJudge {
    /// Version fetched from upstream
    latest: String,
    /// Patch even when versions match
    force: bool,
}

impl UpdateJudge {
    /// Create a new UpdateJudge for the given latest version
    pub fn new(latest: impl Into<String>, force: bool) -> Self {
        Self {
            latest: latest.into(),
            force,
        }
    }

    /// Judge a manifest given the version it currently references
    ///
    /// Versions are compared as raw strings.
    pub fn judge(&self, current: Option<&str>) -> UpdateDecision {
        match current {
            Some(current) if current != self.latest => UpdateDecision::Stale {
                current: current.to_string(),
            },
            None if !self.force => UpdateDecision::Unreadable,
            current if self.force => UpdateDecision::Forced {
                current: current.map(str::to_string),
            },
            _ => UpdateDecision::UpToDate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_up_to_date() {
        let judge = UpdateJudge::new("4200", false);
        assert_eq!(judge.judge(Some("4200")), UpdateDecision::UpToDate);
        assert!(!judge.judge(Some("4200")).needs_update());
    }

    #[test]
    fn test_judge_stale() {
        let judge = UpdateJudge::new("4200", false);
        let decision = judge.judge(Some("4192"));
        assert_eq!(
            decision,
            UpdateDecision::Stale {
                current: "4192".to_string()
            }
        );
        assert!(decision.needs_update());
    }

    #[test]
    fn test_judge_compares_raw_strings() {
        // A "newer" manifest still counts as different
        let judge = UpdateJudge::new("1.2.0", false);
        assert!(judge.judge(Some("1.10.0")).needs_update());
    }

    #[test]
    fn test_judge_unreadable() {
        let judge = UpdateJudge::new("4200", false);
        assert_eq!(judge.judge(None), UpdateDecision::Unreadable);
        assert!(judge.judge(None).needs_update());
    }

    #[test]
    fn test_judge_forced() {
        let judge = UpdateJudge::new("4200", true);
        assert_eq!(
            judge.judge(Some("4200")),
            UpdateDecision::Forced {
                current: Some("4200".to_string())
            }
        );
        assert_eq!(judge.judge(None), UpdateDecision::Forced { current: None });
    }

    #[test]
    fn test_judge_forced_still_reports_stale() {
        let judge = UpdateJudge::new("4200", true);
        assert!(matches!(
            judge.judge(Some("4100")),
            UpdateDecision::Stale { .. }
        ));
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(UpdateDecision::UpToDate.to_string(), "up to date");
        assert_eq!(
            UpdateDecision::Stale {
                current: "1".to_string()
            }
            .to_string(),
            "stale (current 1)"
        );
    }
}
