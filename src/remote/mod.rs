//! Remote access for version pages and download artifacts
//!
//! This module provides:
//! - RemoteSource, the seam between the update workflow and the network
//! - HttpClient, the reqwest-backed implementation

mod client;

pub use client::HttpClient;

use crate::error::FetchError;
use async_trait::async_trait;

/// Trait for anything that can serve version pages and artifacts
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the body of `url` as text
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Download `url` and return the lowercase hex SHA-256 of its body
    async fn sha256(&self, url: &str) -> Result<String, FetchError>;
}
