//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: Issues with the config file or the environment toggles (fatal)
//! - FetchError: Issues fetching the version page or a download artifact
//! - ManifestError: Issues reading, parsing or writing a manifest file
//! - PatchError: Issues applying a version bump to a parsed manifest
//!
//! ConfigError and FetchError end the run. ManifestError and PatchError are
//! confined to the manifest they occurred in.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Network related errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Patch related errors
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// No manifest file exists at any known location
    #[error("no manifest files found under {root}")]
    NoManifests { root: PathBuf },

    /// Every manifest that needed an update failed to be patched
    #[error("all {attempted} manifest update(s) failed")]
    AllUpdatesFailed { attempted: usize },

    /// Results could not be written for the CI job
    #[error("failed to write results to {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON or has the wrong shape
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Required field is missing or empty
    #[error("missing required config field '{field}'")]
    MissingField { field: &'static str },

    /// The version pattern does not compile
    #[error("invalid version pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The version pattern compiles but captures nothing
    #[error("version pattern '{pattern}' must contain a capture group")]
    PatternWithoutGroup { pattern: String },

    /// Release-URL mode selected without a release URL
    #[error("USE_GITHUB_URL is set but GITHUB_RELEASE_URL is empty")]
    MissingReleaseUrl,
}

/// Errors related to remote requests
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP client could not be built
    #[error("failed to create HTTP client: {message}")]
    Client { message: String },

    /// Request could not be sent or the connection broke
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// Request timed out
    #[error("timeout while fetching {url}")]
    Timeout { url: String },

    /// Server answered with a non-success status
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body could not be read
    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    /// The version pattern did not match the page body
    #[error("version pattern '{pattern}' did not match the page at {url}")]
    PatternMismatch { url: String, pattern: String },
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("failed to parse YAML in {path}: {message}")]
    YamlParseError { path: PathBuf, message: String },

    /// YAML serialization error
    #[error("failed to serialize {path}: {message}")]
    YamlWriteError { path: PathBuf, message: String },

    /// The document has no usable `sources` sequence
    #[error("no sources found in {path}")]
    MissingSources { path: PathBuf },
}

/// Errors related to patching a single manifest
#[derive(Error, Debug)]
pub enum PatchError {
    /// The download URL could not be constructed
    #[error("cannot build download URL from '{template}': {message}")]
    UrlConstruction { template: String, message: String },

    /// No source record could be updated
    #[error("no updatable source entry in {path}")]
    NoUpdatableSource { path: PathBuf },
}

impl ConfigError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl FetchError {
    /// Creates a new NetworkError
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Map a reqwest send error into a timeout or network error
    pub fn from_send(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::network(url, err.to_string())
        }
    }
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new YamlParseError
    pub fn yaml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::YamlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new MissingSources error
    pub fn missing_sources(path: impl Into<PathBuf>) -> Self {
        ManifestError::MissingSources { path: path.into() }
    }
}
