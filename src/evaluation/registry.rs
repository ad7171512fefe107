//! Named checker registry.

use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use crate::config::ScanOptions;
use crate::headers::HeaderMap;
use crate::models::Finding;

use super::HeaderEvaluator;

/// A single named rule.
pub trait Checker: Send + Sync {
    /// Name used in `checks` and `unwanted`.
    fn name(&self) -> &str;

    /// Inspects the headers and reports findings.
    fn check(&self, headers: &HeaderMap, options: &ScanOptions) -> Vec<Finding>;
}

/// Checkers keyed by name.
#[derive(Default, Clone)]
pub struct CheckerRegistry {
    checkers: HashMap<String, Arc<dyn Checker>>,
}

impl CheckerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a checker, replacing any previous one with the same name.
    pub fn register(&mut self, checker: Arc<dyn Checker>) {
        self.checkers.insert(checker.name().to_string(), checker);
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.checkers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Looks up a checker by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Checker>> {
        self.checkers.get(name).cloned()
    }

    /// Number of registered checkers.
    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}

/// Evaluator that runs the registered checkers named in the active set.
///
/// Checkers run in active-set order. Names with no registered checker are
/// skipped with a warning.
#[derive(Default, Clone)]
pub struct RegistryEvaluator {
    registry: CheckerRegistry,
}

impl RegistryEvaluator {
    /// Wraps a registry.
    pub fn new(registry: CheckerRegistry) -> Self {
        Self { registry }
    }

    /// The wrapped registry.
    pub fn registry(&self) -> &CheckerRegistry {
        &self.registry
    }
}

impl HeaderEvaluator for RegistryEvaluator {
    fn evaluate(&self, headers: &HeaderMap, options: &ScanOptions) -> Vec<Finding> {
        let mut findings = Vec::new();
        for name in &options.checks {
            match self.registry.get(name) {
                Some(checker) => findings.extend(checker.check(headers, options)),
                None => warn!("Unknown checker '{}' skipped", name),
            }
        }
        findings
    }

    fn checker_names(&self) -> Vec<String> {
        self.registry.names()
    }
}
