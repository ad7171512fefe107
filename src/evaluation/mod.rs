//! Evaluation bridge.
//!
//! Hands a header map and the active configuration to a `HeaderEvaluator` and
//! stamps the returned findings with the identity of the hop that produced the
//! headers. The evaluator itself never sees URLs.

mod registry;

pub use registry::{Checker, CheckerRegistry, RegistryEvaluator};

use crate::config::ScanOptions;
use crate::headers::HeaderMap;
use crate::models::{Finding, UrlId};

/// Turns a header map into findings.
///
/// Implementations must be pure with respect to their inputs. They receive
/// options whose `checks` already hold the active rule set.
pub trait HeaderEvaluator: Send + Sync {
    /// Evaluates one header map.
    fn evaluate(&self, headers: &HeaderMap, options: &ScanOptions) -> Vec<Finding>;

    /// Names of the checkers this evaluator knows about.
    fn checker_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// `checks` minus `unwanted`, keeping the order of `checks`.
pub fn active_checks(options: &ScanOptions) -> Vec<String> {
    options
        .checks
        .iter()
        .filter(|check| !options.unwanted.contains(*check))
        .cloned()
        .collect()
}

/// A copy of `options` whose `checks` is the active rule set.
pub fn effective_options(options: &ScanOptions) -> ScanOptions {
    ScanOptions {
        checks: active_checks(options),
        ..options.clone()
    }
}

/// Runs the evaluator on the active rule set without stamping identity.
pub fn evaluate_headers(
    evaluator: &dyn HeaderEvaluator,
    headers: &HeaderMap,
    options: &ScanOptions,
) -> Vec<Finding> {
    let effective = effective_options(options);
    evaluator.evaluate(headers, &effective)
}

/// Runs the evaluator and stamps every finding with `url` and `url_id`.
///
/// Stamping overwrites whatever the evaluator put there.
pub fn evaluate_for_target(
    evaluator: &dyn HeaderEvaluator,
    headers: &HeaderMap,
    options: &ScanOptions,
    url: &str,
    url_id: UrlId,
) -> Vec<Finding> {
    let mut findings = evaluate_headers(evaluator, headers, options);
    for finding in &mut findings {
        finding.stamp(url, url_id);
    }
    findings
}
