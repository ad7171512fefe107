//! HTTP redirect decisions.
//!
//! Redirects are followed manually, one hop at a time, so the fetch loop can
//! keep the caller's identifier on every hop and stop when the hop budget runs
//! out.

use log::debug;

use crate::config::REDIRECT_STATUS_RANGE;
use crate::fetch::target::has_scheme;
use crate::headers::HeaderMap;
use crate::models::Target;

/// What the fetch loop should do with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Fetch `location` next, spending one hop
    Follow {
        /// Raw `Location` value; empty when the header was missing
        location: String,
    },
    /// Evaluate this response's headers as they are
    Evaluate,
}

/// Returns true for any status in `[300, 400)`.
pub fn is_redirect(status: u16) -> bool {
    REDIRECT_STATUS_RANGE.contains(&status)
}

/// Decides whether a response should be followed.
///
/// A redirect with an exhausted budget is not an error: its own headers are
/// evaluated. A redirect without a `Location` header is still followed, with an
/// empty location that will fail resolution on the next hop.
pub fn redirect_decision(status: u16, headers: &HeaderMap, remaining: u32) -> RedirectDecision {
    if !is_redirect(status) {
        return RedirectDecision::Evaluate;
    }
    if remaining == 0 {
        debug!("Redirect budget exhausted at status {}", status);
        return RedirectDecision::Evaluate;
    }
    RedirectDecision::Follow {
        location: headers.get("location").unwrap_or_default().to_string(),
    }
}

/// Builds the target for the next hop.
///
/// Absolute locations are used as they are. Every other reference (`/path`,
/// `//host/path`, `page`, `../up`) is resolved against the current URL. An
/// empty location from a missing header is kept empty so the next hop fails
/// resolution.
pub fn next_hop(target: &Target, current_url: &str, location: &str) -> Target {
    if location.is_empty() || has_scheme(location) {
        return target.hop(location);
    }
    match url::Url::parse(current_url).and_then(|base| base.join(location)) {
        Ok(joined) => target.hop(joined.to_string()),
        Err(e) => {
            debug!("Cannot resolve {:?} against {}: {}", location, current_url, e);
            target.hop(location)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_location(location: &str) -> HeaderMap {
        HeaderMap::from_lines(&[format!("Location: {location}")])
    }

    #[test]
    fn test_is_redirect_range() {
        assert!(!is_redirect(299));
        assert!(is_redirect(300));
        assert!(is_redirect(301));
        assert!(is_redirect(308));
        assert!(is_redirect(399));
        assert!(!is_redirect(400));
        assert!(!is_redirect(200));
    }

    #[test]
    fn test_decision_follows_with_budget() {
        let headers = headers_with_location("https://example.org/");
        assert_eq!(
            redirect_decision(301, &headers, 3),
            RedirectDecision::Follow {
                location: "https://example.org/".to_string()
            }
        );
    }

    #[test]
    fn test_decision_evaluates_when_budget_exhausted() {
        let headers = headers_with_location("https://example.org/");
        assert_eq!(redirect_decision(302, &headers, 0), RedirectDecision::Evaluate);
    }

    #[test]
    fn test_decision_evaluates_non_redirect() {
        let headers = headers_with_location("https://example.org/");
        assert_eq!(redirect_decision(200, &headers, 3), RedirectDecision::Evaluate);
    }

    #[test]
    fn test_decision_missing_location_is_empty() {
        assert_eq!(
            redirect_decision(307, &HeaderMap::new(), 1),
            RedirectDecision::Follow {
                location: String::new()
            }
        );
    }

    #[test]
    fn test_next_hop_keeps_url_id() {
        let target = Target::new(42, "example.com");
        let next = next_hop(&target, "https://example.com", "https://example.org/");
        assert_eq!(next.url_id, 42);
        assert_eq!(next.url, "https://example.org/");
    }

    #[test]
    fn test_next_hop_joins_host_relative_location() {
        let target = Target::new(7, "http://example.com:8080/old");
        let next = next_hop(&target, "http://example.com:8080/old?x=1", "/new?y=2");
        assert_eq!(next.url, "http://example.com:8080/new?y=2");
        assert_eq!(next.url_id, 7);
    }

    #[test]
    fn test_next_hop_keeps_scheme_for_scheme_relative_location() {
        let target = Target::new(9, "http://127.0.0.1:8080/a");
        let next = next_hop(&target, "http://127.0.0.1:8080/a", "//127.0.0.1:9090/b");
        assert_eq!(next.url, "http://127.0.0.1:9090/b");
        assert_eq!(next.url_id, 9);
    }

    #[test]
    fn test_next_hop_resolves_path_relative_locations() {
        let target = Target::new(1, "https://example.com/dir/page");
        let current = "https://example.com/dir/page";
        assert_eq!(next_hop(&target, current, "other").url, "https://example.com/dir/other");
        assert_eq!(next_hop(&target, current, "../up").url, "https://example.com/up");
        assert_eq!(next_hop(&target, current, "?q=1").url, "https://example.com/dir/page?q=1");
    }

    #[test]
    fn test_next_hop_keeps_absolute_and_empty_locations() {
        let target = Target::new(1, "example.com");
        assert_eq!(
            next_hop(&target, "https://example.com", "http://example.org").url,
            "http://example.org"
        );
        assert_eq!(next_hop(&target, "https://example.com", "").url, "");
    }

    #[test]
    fn test_next_hop_unparsable_base_falls_back_to_location() {
        let target = Target::new(1, "not a url");
        assert_eq!(next_hop(&target, "not a url", "/next").url, "/next");
    }
}
