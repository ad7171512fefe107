//! security_headers library: fetch HTTP response headers and check them
//!
//! This library resolves targets, follows redirect chains under a hop budget,
//! fetches many targets concurrently over a bounded worker pool, and hands the
//! resulting header maps to a pluggable evaluator. Transport failures never
//! abort a batch; each one becomes a single error finding for its target.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use security_headers::{CheckerRegistry, RegistryEvaluator, ScanOptions, Scanner};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ScanOptions {
//!     checks: vec!["XFrameOptionsChecker".to_string()],
//!     timeout_seconds: Some(10),
//!     ..Default::default()
//! };
//! let evaluator = Arc::new(RegistryEvaluator::new(CheckerRegistry::new()));
//! let scanner = Scanner::new(options, evaluator)?;
//!
//! let results = scanner
//!     .check_headers_parallel(vec!["example.com", "example.org"], None)
//!     .await?;
//! for findings in &results {
//!     for finding in findings {
//!         println!("{:?} {}: {}", finding.url, finding.severity, finding.message);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Batch scans require a Tokio runtime. Calling them from any other executor
//! fails with `ScanError::ParallelismUnsupported`.

#![warn(missing_docs)]

pub mod config;
mod dispatch;
mod error_handling;
mod evaluation;
mod fetch;
mod headers;
pub mod initialization;
mod models;
mod scanner;
mod summary;
mod user_agent;

// Re-export public API
pub use config::{LogFormat, LogLevel, ScanOptions};
pub use dispatch::{check_targets_parallel, ResultCallback};
pub use error_handling::{
    categorize_reqwest_error, error_finding, ErrorType, InitializationError, ScanError,
};
pub use evaluation::{
    active_checks, effective_options, evaluate_for_target, evaluate_headers, Checker,
    CheckerRegistry, HeaderEvaluator, RegistryEvaluator,
};
pub use fetch::{
    check_target, has_scheme, is_redirect, next_hop, normalize_target, open_and_get,
    redirect_decision, resolve_target, ConnectionRequest, ProcessingContext, Protocol,
    RawResponse, RedirectDecision, ReqwestTransport, ResolvedTarget, Transport,
};
pub use headers::HeaderMap;
pub use models::{Finding, FindingKind, Severity, Target, UrlId};
pub use scanner::Scanner;
pub use summary::{log_summary, ScanSummary};
pub use user_agent::random_user_agent;
