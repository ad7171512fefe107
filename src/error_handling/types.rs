//! Error type definitions.
//!
//! This module defines the errors raised while fetching a target and the
//! coarse categories used to triage them.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::TIMEOUT_MESSAGE;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Errors raised while scanning a target or dispatching a batch.
///
/// Everything except `ParallelismUnsupported` is caught at the target boundary
/// and turned into an error finding.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The normalized target is not a parseable URL.
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        /// The URL that failed to parse
        url: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// The scheme is neither `http` nor `https`.
    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),

    /// The connection or response read exceeded the configured timeout.
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    /// The TLS handshake failed.
    #[error("TLS handshake failed: {0}")]
    Handshake(String),

    /// The host could not be reached or refused the connection.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other request or response failure.
    #[error("Request failed: {0}")]
    Request(String),

    /// A worker task ended without producing a result.
    #[error("Worker failed: {0}")]
    WorkerFailed(String),

    /// No runtime is available to run a batch concurrently.
    #[error("Parallelism is not supported: {0}")]
    ParallelismUnsupported(String),
}

impl ScanError {
    /// The triage category of this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ScanError::InvalidUrl { .. } => ErrorType::InvalidUrl,
            ScanError::UnknownProtocol(_) => ErrorType::Configuration,
            ScanError::Timeout => ErrorType::Timeout,
            ScanError::Handshake(_) => ErrorType::Handshake,
            ScanError::Connect(_) => ErrorType::Connect,
            ScanError::Request(_) => ErrorType::Request,
            ScanError::WorkerFailed(_) => ErrorType::Worker,
            ScanError::ParallelismUnsupported(_) => ErrorType::Parallelism,
        }
    }
}

/// Categories of scan failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Target uses an unsupported protocol; never retried
    Configuration,
    /// Target could not be parsed as a URL
    InvalidUrl,
    /// Connect or read exceeded the timeout
    Timeout,
    /// TLS handshake failed
    Handshake,
    /// Host unreachable or connection refused
    Connect,
    /// Malformed response or other request failure
    Request,
    /// Worker task panicked or was cancelled
    Worker,
    /// Batch could not run concurrently
    Parallelism,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Human-readable name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Configuration => "Configuration error",
            ErrorType::InvalidUrl => "Invalid URL",
            ErrorType::Timeout => "Timeout",
            ErrorType::Handshake => "TLS handshake error",
            ErrorType::Connect => "Connection error",
            ErrorType::Request => "Request error",
            ErrorType::Worker => "Worker error",
            ErrorType::Parallelism => "Parallelism unsupported",
        }
    }

    /// Whether the failure stays confined to a single target.
    pub fn is_per_target(&self) -> bool {
        !matches!(self, ErrorType::Parallelism)
    }
}
