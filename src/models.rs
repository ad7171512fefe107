//! Core data model: scan targets and findings.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::config::DEFAULT_URL_ID;

/// Caller-assigned identifier that follows a target through redirects and
/// parallel execution.
pub type UrlId = u64;

/// One URL to scan plus the identifier used to match results back to it.
///
/// A new `Target` is built for every redirect hop; the identifier never changes
/// along the chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Identifier assigned by the caller (or `DEFAULT_URL_ID`)
    pub url_id: UrlId,
    /// Raw URL string as supplied, possibly without a scheme
    pub url: String,
}

impl Target {
    /// Creates a target with an explicit identifier.
    pub fn new(url_id: UrlId, url: impl Into<String>) -> Self {
        Self {
            url_id,
            url: url.into(),
        }
    }

    /// Builds the target for the next redirect hop, keeping the identifier.
    pub fn hop(&self, location: impl Into<String>) -> Self {
        Self::new(self.url_id, location)
    }
}

impl From<&str> for Target {
    fn from(url: &str) -> Self {
        Target::new(DEFAULT_URL_ID, url)
    }
}

impl From<String> for Target {
    fn from(url: String) -> Self {
        Target::new(DEFAULT_URL_ID, url)
    }
}

impl From<(UrlId, &str)> for Target {
    fn from((url_id, url): (UrlId, &str)) -> Self {
        Target::new(url_id, url)
    }
}

impl From<(UrlId, String)> for Target {
    fn from((url_id, url): (UrlId, String)) -> Self {
        Target::new(url_id, url)
    }
}

/// What kind of observation a finding records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FindingKind {
    /// Informational observation
    Info,
    /// Compliance issue
    Warning,
    /// Transport or evaluation failure
    Error,
}

/// Severity attached to a finding.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// No security impact
    None,
    /// Informational
    Info,
    /// Low risk
    Low,
    /// Moderate risk
    Medium,
    /// Significant risk
    High,
    /// The target could not be evaluated
    Error,
}

/// One reported observation about a target.
///
/// Produced either by the header evaluator or by the error classifier. The
/// originating URL and identifier are filled in by the fetch layer, which is
/// the only place that knows which hop produced the headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the checker that produced the finding; `None` for transport errors
    pub checker: Option<String>,
    /// Kind of observation
    pub kind: FindingKind,
    /// Human-readable description
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Header the finding refers to, if any
    pub header: Option<String>,
    /// Header value (or directive) the finding refers to, if any
    pub value: Option<String>,
    /// URL of the hop whose headers were evaluated
    pub url: Option<String>,
    /// Identifier of the originating target
    pub url_id: Option<UrlId>,
}

impl Finding {
    /// Creates a finding without header context or target identity.
    pub fn new(
        checker: Option<&str>,
        kind: FindingKind,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            checker: checker.map(str::to_string),
            kind,
            message: message.into(),
            severity,
            header: None,
            value: None,
            url: None,
            url_id: None,
        }
    }

    /// Attaches the header name and value the finding is about.
    pub fn with_header(mut self, header: impl Into<String>, value: Option<String>) -> Self {
        self.header = Some(header.into());
        self.value = value;
        self
    }

    /// Returns true for error findings synthesized from a failed fetch.
    pub fn is_transport_error(&self) -> bool {
        self.kind == FindingKind::Error && self.checker.is_none()
    }

    /// Overwrites the originating URL and identifier.
    pub(crate) fn stamp(&mut self, url: &str, url_id: UrlId) {
        self.url = Some(url.to_string());
        self.url_id = Some(url_id);
    }
}
