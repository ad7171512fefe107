//! Error categorization and classification.
//!
//! Transport failures are mapped onto `ScanError` here, and any `ScanError`
//! raised for a target is converted into a single error finding so that it
//! never escapes the target boundary.

use std::error::Error as StdError;

use crate::models::{Finding, FindingKind, Severity, UrlId};

use super::types::ScanError;

/// Fragments that mark a connect failure as a TLS handshake problem.
const TLS_MARKERS: &[&str] = &["tls", "ssl", "certificate", "handshake"];

/// Categorizes a `reqwest::Error` into a `ScanError`.
///
/// Timeouts are checked first so they always get the dedicated timeout message.
/// Connect failures are split into handshake and plain connection errors by
/// inspecting the source chain.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ScanError {
    let detail = error_chain_message(error);

    if error.is_timeout() {
        ScanError::Timeout
    } else if error.is_connect() {
        if mentions_tls(&detail) {
            ScanError::Handshake(detail)
        } else {
            ScanError::Connect(detail)
        }
    } else {
        ScanError::Request(detail)
    }
}

/// Converts a per-target failure into exactly one error finding.
///
/// The finding has no checker, error kind and error severity, and carries the
/// URL and identifier of the hop that failed.
pub fn error_finding(error: &ScanError, url: &str, url_id: UrlId) -> Finding {
    log::warn!(
        "[{}] {} (url_id={}): {}",
        error.error_type(),
        url,
        url_id,
        error
    );
    let mut finding = Finding::new(
        None,
        FindingKind::Error,
        error.to_string(),
        Severity::Error,
    );
    finding.stamp(url, url_id);
    finding
}

/// Joins an error and its sources into one `a: b: c` message.
///
/// A cause whose text already appears in the message is skipped.
fn error_chain_message(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn mentions_tls(message: &str) -> bool {
    let lower = message.to_lowercase();
    TLS_MARKERS.iter().any(|marker| lower.contains(marker))
}
