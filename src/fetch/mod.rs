//! Single-target fetch pipeline.
//!
//! One call to [`check_target`] resolves a target, performs a GET, follows
//! redirects while the hop budget allows, and hands the last response's headers
//! to the evaluator. Every failure on the way is turned into one error finding;
//! nothing escapes the target boundary.

mod connection;
mod context;
mod redirects;
mod target;

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, warn};

use crate::config::ScanOptions;
use crate::error_handling::{error_finding, ScanError};
use crate::evaluation::evaluate_for_target;
use crate::models::{Finding, Target};

pub use connection::{
    open_and_get, ConnectionRequest, Protocol, RawResponse, ReqwestTransport, Transport,
};
pub use context::ProcessingContext;
pub use redirects::{is_redirect, next_hop, redirect_decision, RedirectDecision};
pub use target::{has_scheme, normalize_target, resolve_target, ResolvedTarget};

/// Scans one target and returns its findings.
///
/// # Arguments
///
/// * `ctx` - Transport and evaluator
/// * `target` - The target to scan; its `url_id` is kept on every hop
/// * `follow_redirects` - Hop budget; `0` evaluates the first response as is
/// * `timeout` - Per-request timeout, applied to every hop
/// * `options` - Configuration for this scan
///
/// Findings carry the normalized URL of the hop whose headers were evaluated,
/// or of the hop that failed.
pub async fn check_target(
    ctx: &ProcessingContext,
    target: Target,
    follow_redirects: u32,
    timeout: Option<Duration>,
    options: &ScanOptions,
) -> Vec<Finding> {
    let mut current = target;
    let mut remaining = follow_redirects;
    let mut visited: HashSet<String> = HashSet::new();

    loop {
        let url = normalize_target(&current.url, &options.default_scheme);
        if !visited.insert(url.clone()) {
            warn!(
                "Redirect chain revisits {} (url_id={}), {} hop(s) left",
                url, current.url_id, remaining
            );
        }

        let response = match fetch_hop(ctx, &url, timeout).await {
            Ok(response) => response,
            Err(e) => return vec![error_finding(&e, &url, current.url_id)],
        };

        match redirect_decision(response.status, &response.headers, remaining) {
            RedirectDecision::Follow { location } => {
                debug!(
                    "{} -> {} ({}), url_id={}",
                    url, location, response.status, current.url_id
                );
                current = next_hop(&current, &url, &location);
                remaining -= 1;
            }
            RedirectDecision::Evaluate => {
                return evaluate_for_target(
                    ctx.evaluator.as_ref(),
                    &response.headers,
                    options,
                    &url,
                    current.url_id,
                );
            }
        }
    }
}

/// Resolves a normalized URL and performs a single GET.
async fn fetch_hop(
    ctx: &ProcessingContext,
    url: &str,
    timeout: Option<Duration>,
) -> Result<RawResponse, ScanError> {
    let resolved = resolve_target(url)?;
    open_and_get(ctx.transport.as_ref(), &resolved, timeout).await
}
