//! HTTP client initialization.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::ScanOptions;

/// Initializes the HTTP client used by the connection manager.
///
/// Creates a `reqwest::Client` configured with:
/// - Redirects disabled, so every hop is seen and counted by the redirect resolver
/// - Certificate validation controlled by `accept_invalid_certs`
/// - No client-wide timeout; the per-target timeout is applied per request
///
/// The User-Agent is chosen per request, so none is set here.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(options: &ScanOptions) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    if options.accept_invalid_certs {
        log::debug!("TLS certificate validation disabled for header scans");
    }
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .danger_accept_invalid_certs(options.accept_invalid_certs)
        .danger_accept_invalid_hostnames(options.accept_invalid_certs)
        .build()?;
    Ok(Arc::new(client))
}
