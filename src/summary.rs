//! Batch summary statistics.

use std::collections::BTreeMap;

use log::info;
use strum::IntoEnumIterator;

use crate::config::TIMEOUT_MESSAGE;
use crate::models::{Finding, Severity};

/// Counts over the results of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of targets in the batch
    pub targets: usize,
    /// Targets with at least one transport error finding
    pub failed_targets: usize,
    /// Failed targets whose error was a timeout
    pub timed_out_targets: usize,
    /// Findings per severity, including transport errors
    pub by_severity: BTreeMap<Severity, usize>,
}

impl ScanSummary {
    /// Builds a summary from per-target findings.
    pub fn from_results(results: &[Vec<Finding>]) -> Self {
        let mut summary = ScanSummary {
            targets: results.len(),
            ..Default::default()
        };

        for findings in results {
            let mut errors = findings.iter().filter(|f| f.is_transport_error()).peekable();
            if errors.peek().is_some() {
                summary.failed_targets += 1;
                if errors.any(|f| f.message == TIMEOUT_MESSAGE) {
                    summary.timed_out_targets += 1;
                }
            }
            for finding in findings {
                *summary.by_severity.entry(finding.severity).or_insert(0) += 1;
            }
        }
        summary
    }

    /// Targets that produced evaluated findings.
    pub fn succeeded_targets(&self) -> usize {
        self.targets - self.failed_targets
    }

    /// Number of findings with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    /// Total number of findings.
    pub fn total_findings(&self) -> usize {
        self.by_severity.values().sum()
    }
}

/// Logs a summary at info level.
///
/// Works with both plain and JSON log formats.
pub fn log_summary(summary: &ScanSummary) {
    info!(
        "Scanned {} target{} ({} succeeded, {} failed, {} timed out)",
        summary.targets,
        if summary.targets == 1 { "" } else { "s" },
        summary.succeeded_targets(),
        summary.failed_targets,
        summary.timed_out_targets
    );

    let total = summary.total_findings();
    if total > 0 {
        info!("Finding Counts ({} total):", total);
        for severity in Severity::iter().rev() {
            let count = summary.count(severity);
            if count > 0 {
                info!("   {}: {}", severity, count);
            }
        }
    }
}
