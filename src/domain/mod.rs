//! Core domain models
//!
//! This module contains the fundamental types used throughout the application:
//! - Architecture tags and the architecture directory layout
//! - Version extraction from artifact names and version normalization

mod arch;
mod version;

pub use arch::{Arch, ARCH_DIRS};
pub use version::{extract_version, normalize_version};
