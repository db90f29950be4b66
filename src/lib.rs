//! linglong-bump - upstream release checker for linglong package manifests
//!
//! This library provides the core functionality for keeping linglong.yaml
//! manifests on the latest upstream release:
//! - Fetching the latest version from an upstream download page
//! - Locating the root and per-architecture manifests
//! - Rewriting source URL, digest, file name and package version
//! - Reporting results to the surrounding CI job

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod remote;
pub mod update;
