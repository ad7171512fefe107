//! Configuration types.
//!
//! This module defines the scan configuration consumed by the fetch layer and
//! the logging options used at initialization.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::config::constants::{DEFAULT_MAX_WORKERS, DEFAULT_REDIRECT_HOPS, DEFAULT_SCHEME};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Scan configuration.
///
/// Read-only for the duration of a scan. One instance is supplied per batch and
/// any single call may pass its own instance instead.
///
/// `checks` minus `unwanted` is the active rule set; that subtraction happens in
/// the evaluation bridge before the evaluator is invoked.
///
/// # Examples
///
/// ```
/// use security_headers::ScanOptions;
///
/// let options = ScanOptions {
///     checks: vec!["XFrameOptionsChecker".to_string()],
///     timeout_seconds: Some(10),
///     ..Default::default()
/// };
/// assert_eq!(options.redirects, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Checker names the caller wants to run
    pub checks: Vec<String>,

    /// Checker names removed from `checks`
    pub unwanted: Vec<String>,

    /// Maximum number of redirect hops to follow
    pub redirects: u32,

    /// Scheme prepended to targets that have none
    #[serde(alias = "defaultscheme")]
    pub default_scheme: String,

    /// Per-request timeout in seconds; `None` lets a connection block indefinitely
    #[serde(alias = "timeout")]
    pub timeout_seconds: Option<u64>,

    /// Skip TLS certificate validation.
    ///
    /// Enabled by default: the scanner inspects headers of hosts that may be
    /// self-signed or misconfigured, so certificate trust is not enforced.
    /// This is a known security trade-off of the tool.
    pub accept_invalid_certs: bool,

    /// Worker pool capacity for batch scans
    pub max_workers: usize,

    /// Per-checker option values, keyed by checker name then option name
    pub checker_options: HashMap<String, HashMap<String, String>>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            checks: Vec::new(),
            unwanted: Vec::new(),
            redirects: DEFAULT_REDIRECT_HOPS,
            default_scheme: DEFAULT_SCHEME.to_string(),
            timeout_seconds: None,
            accept_invalid_certs: true,
            max_workers: DEFAULT_MAX_WORKERS,
            checker_options: HashMap::new(),
        }
    }
}

impl ScanOptions {
    /// Parses options from a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The per-request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Sets an option value for a single checker.
    pub fn set_option(&mut self, checker: &str, key: &str, value: impl Into<String>) {
        self.checker_options
            .entry(checker.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Looks up an option value for a single checker.
    pub fn get_option(&self, checker: &str, key: &str) -> Option<&str> {
        self.checker_options
            .get(checker)
            .and_then(|opts| opts.get(key))
            .map(String::as_str)
    }
}
