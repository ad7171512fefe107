//! Target normalization and decomposition.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::URL_SCHEME_PATTERN;
use crate::error_handling::ScanError;

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(URL_SCHEME_PATTERN).expect("URL_SCHEME_PATTERN is a valid regex")
});

/// A target URL broken into the parts the connection manager needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Normalized URL string, exactly as it will be reported on findings
    pub url: String,
    /// URL scheme (`http`, `https`, or anything else the caller supplied)
    pub protocol: String,
    /// Host, including the port when one was given explicitly
    pub host: String,
    /// Request path (`/` when empty), with the query string if present
    pub path: String,
}

/// Returns true if the string starts with an explicit `scheme://` prefix.
pub fn has_scheme(url: &str) -> bool {
    SCHEME_RE.is_match(url)
}

/// Normalizes a raw target string into a scheme-qualified URL.
///
/// Surrounding whitespace and quote characters are removed. Targets without a
/// scheme get `<default_scheme>://` prepended; an existing scheme is kept as is.
///
/// # Examples
///
/// ```
/// use security_headers::normalize_target;
///
/// assert_eq!(normalize_target("\"example.com\"", "https"), "https://example.com");
/// assert_eq!(normalize_target("http://example.com", "https"), "http://example.com");
/// ```
pub fn normalize_target(raw: &str, default_scheme: &str) -> String {
    let url = raw.trim().trim_matches('"');
    if has_scheme(url) {
        url.to_string()
    } else {
        format!("{default_scheme}://{url}")
    }
}

/// Decomposes a normalized URL into protocol, host and path.
///
/// # Errors
///
/// Returns `ScanError::InvalidUrl` if the string is not a parseable URL or has
/// no host.
pub fn resolve_target(url: &str) -> Result<ResolvedTarget, ScanError> {
    let parsed = url::Url::parse(url).map_err(|source| ScanError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => {
            return Err(ScanError::InvalidUrl {
                url: url.to_string(),
                source: url::ParseError::EmptyHost,
            })
        }
    };
    let host = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let mut path = match parsed.path() {
        "" => "/".to_string(),
        p => p.to_string(),
    };
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }

    Ok(ResolvedTarget {
        url: url.to_string(),
        protocol: parsed.scheme().to_string(),
        host,
        path,
    })
}
