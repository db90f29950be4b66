//! Architecture tags for linglong package manifests

use std::fmt;

/// Architecture subdirectories that may carry their own manifest
pub const ARCH_DIRS: &[&str] = &["amd64", "arm64", "sw64", "riscv64", "loong64", "mips64"];

/// Target CPU architecture of a download artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Arch {
    /// x86_64 (the fallback when nothing else is recognised)
    #[default]
    Amd64,
    /// AArch64
    Arm64,
}

impl Arch {
    /// Infer the architecture from a source URL
    ///
    /// Only arm64 is recognised (`arm64` or `aarch64` anywhere in the URL);
    /// every other URL is treated as amd64.
    pub fn from_url(url: &str) -> Self {
        if url.contains("arm64") || url.contains("aarch64") {
            Arch::Arm64
        } else {
            Arch::Amd64
        }
    }

    /// Returns the tag used in URLs and directory names
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }

    /// Returns the opposite tag of the amd64/arm64 pair
    pub fn other(&self) -> Self {
        match self {
            Arch::Amd64 => Arch::Arm64,
            Arch::Arm64 => Arch::Amd64,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_arm64() {
        assert_eq!(
            Arch::from_url("https://example.com/app_1.0_arm64.deb"),
            Arch::Arm64
        );
    }

    #[test]
    fn test_from_url_aarch64() {
        assert_eq!(
            Arch::from_url("https://example.com/app-1.0.aarch64.rpm"),
            Arch::Arm64
        );
    }

    #[test]
    fn test_from_url_defaults_to_amd64() {
        assert_eq!(
            Arch::from_url("https://example.com/app_1.0_amd64.deb"),
            Arch::Amd64
        );
        assert_eq!(
            Arch::from_url("https://example.com/app-1.0-riscv64.deb"),
            Arch::Amd64
        );
    }

    #[test]
    fn test_display_and_other() {
        assert_eq!(Arch::Arm64.to_string(), "arm64");
        assert_eq!(Arch::Amd64.other(), Arch::Arm64);
        assert_eq!(Arch::Arm64.other(), Arch::Amd64);
    }

    #[test]
    fn test_arch_dirs_order() {
        assert_eq!(ARCH_DIRS.first(), Some(&"amd64"));
        assert_eq!(ARCH_DIRS.len(), 6);
    }
}
