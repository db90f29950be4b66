//! Results channel for the surrounding CI job
//!
//! Results are appended as `key=value` lines to the file named by
//! `GITHUB_OUTPUT`. Without that file they are only logged.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Append-only key=value results file
#[derive(Debug, Clone, Default)]
pub struct GithubOutput {
    path: Option<PathBuf>,
}

impl GithubOutput {
    /// Create an output writer; `None` disables writing
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Path results are appended to, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append every entry as a `key=value` line
    pub fn write(&self, entries: &[(&str, String)]) -> io::Result<()> {
        let Some(path) = &self.path else {
            for (key, value) in entries {
                info!("{}={}", key, value);
            }
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for (key, value) in entries {
            writeln!(file, "{}={}", key, value)?;
        }
        Ok(())
    }
}
