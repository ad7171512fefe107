//! Error handling and classification.
//!
//! This module provides:
//! - Error type definitions (`ScanError`, `InitializationError`)
//! - Triage categories (`ErrorType`)
//! - Mapping of `reqwest` failures onto `ScanError`
//! - Conversion of per-target failures into error findings
//!
//! Failures are grouped into:
//! - **Configuration**: unsupported protocol, fatal to the target, never retried
//! - **Transport**: timeout, handshake, connect and request failures, recovered
//!   at the target boundary
//! - **Parallelism**: no runtime to dispatch a batch on, fatal to the batch

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, error_finding};
pub use types::{ErrorType, InitializationError, ScanError};
