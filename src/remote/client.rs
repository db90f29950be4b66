//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Connect and read timeouts so a stalled server cannot hang a CI job
//! - A crate User-Agent
//! - Streaming SHA-256 of download bodies

use super::RemoteSource;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;

/// Default connect timeout (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read timeout relative to the connect timeout
const READ_TIMEOUT_FACTOR: u32 = 4;

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("linglong-bump/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    ///
    /// `timeout` bounds connection setup; each read of the body may take
    /// up to four times as long. There is no bound on total transfer time.
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout * READ_TIMEOUT_FACTOR)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Client {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Create a client using the crate User-Agent and the given timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Perform a GET request, failing on any non-success status
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_send(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl RemoteSource for HttpClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn sha256(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self.get(url).await?;
        let mut hasher = Sha256::new();
        let mut total: u64 = 0;

        while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })? {
            total += chunk.len() as u64;
            hasher.update(&chunk);
        }

        debug!(url, bytes = total, "hashed download");
        Ok(format!("{:x}", hasher.finalize()))
    }
}
