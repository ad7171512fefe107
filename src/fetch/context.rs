//! Processing context for target scans.
//!
//! Groups the shared resources every worker needs so they can be cloned into
//! spawned tasks as one value.

use std::sync::Arc;

use crate::evaluation::HeaderEvaluator;
use crate::fetch::connection::Transport;

/// Shared, read-only resources for scanning targets.
#[derive(Clone)]
pub struct ProcessingContext {
    /// Performs one GET per hop
    pub transport: Arc<dyn Transport>,
    /// Turns the final hop's headers into findings
    pub evaluator: Arc<dyn HeaderEvaluator>,
}

impl ProcessingContext {
    /// Creates a new `ProcessingContext` with the given resources.
    pub fn new(transport: Arc<dyn Transport>, evaluator: Arc<dyn HeaderEvaluator>) -> Self {
        Self {
            transport,
            evaluator,
        }
    }
}
