//! Error types for appcask
//!
//! This module provides the error taxonomy for the export pipeline:
//! - Search outcomes (nothing found, malformed catalog response)
//! - Per-asset download failures, which callers isolate at the asset boundary
//! - User-driven outcomes (invalid selection, cancellation)
//! - Mapping of a whole run onto process exit codes
//!
//! An asset the app simply does not provide is *not* an error. Lookups for
//! absent fields return `None` and the orchestrator reports a skip.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for appcask operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for appcask
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog search returned no results for the term
    #[error("no apps found for \"{0}\"")]
    NotFound(String),

    /// User input outside the offered choices
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Fetching or saving one asset failed
    #[error("download failed for {url}: {reason}")]
    DownloadFailed {
        /// The asset URL that could not be saved
        url: String,
        /// Transport or I/O failure description
        reason: String,
    },

    /// The catalog answered with something that is not a search result document
    #[error("failed to parse catalog response: {0}")]
    ParseFailed(String),

    /// The catalog answered with a non-success HTTP status
    #[error("search failed: HTTP {status}")]
    SearchFailed {
        /// HTTP status code returned by the catalog
        status: u16,
    },

    /// The user cancelled the run (Ctrl+C or closed stdin)
    #[error("interrupted")]
    Interrupted,

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "http.asset_timeout")
        key: Option<String>,
    },

    /// Some metadata artifacts could not be written
    #[error("metadata export incomplete: {} written, {} failed", written.len(), failed.len())]
    ExportIncomplete {
        /// Artifacts that reached the disk
        written: Vec<PathBuf>,
        /// Artifacts that failed, with the reason
        failed: Vec<(PathBuf, String)>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get the machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::InvalidSelection(_) => "invalid_selection",
            Error::DownloadFailed { .. } => "download_failed",
            Error::ParseFailed(_) => "parse_failed",
            Error::SearchFailed { .. } => "search_failed",
            Error::Interrupted => "interrupted",
            Error::Config { .. } => "config_error",
            Error::ExportIncomplete { .. } => "export_incomplete",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Other(_) => "internal_error",
        }
    }

    /// Wrap a transport or I/O failure for one asset URL
    pub fn download_failed(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::DownloadFailed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Final result of a run, as seen by the process
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Export finished, or the run ended gracefully (no results, user quit)
    Success,
    /// The user interrupted the run
    Cancelled,
    /// Anything unanticipated
    Failed,
}

impl Outcome {
    /// Classify the result of a whole run
    ///
    /// A search with no results and an invalid selection end the run without
    /// doing anything, which is a graceful end rather than a failure.
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Outcome::Success,
            Err(Error::Interrupted) => Outcome::Cancelled,
            Err(Error::NotFound(_)) | Err(Error::InvalidSelection(_)) => Outcome::Success,
            Err(_) => Outcome::Failed,
        }
    }

    /// Process exit code for this outcome
    ///
    /// - 0: success
    /// - 1: failure
    /// - 130: cancelled (128 + SIGINT)
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Failed => 1,
            Outcome::Cancelled => 130,
        }
    }
}
