//! Scan configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, redirect range, User-Agent pool)
//! - The `ScanOptions` configuration consumed by every scan entry point
//! - Logging option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, ScanOptions};
