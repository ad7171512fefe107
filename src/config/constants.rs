//! Configuration constants.
//!
//! This module defines the defaults used when a configuration source leaves an
//! option unset, plus the fixed User-Agent pool.

use std::ops::Range;

/// Identifier given to targets supplied as a bare URL string.
pub const DEFAULT_URL_ID: u64 = 1;

/// Scheme prepended to targets that do not carry one.
pub const DEFAULT_SCHEME: &str = "https";

/// Number of redirect hops followed when the caller does not say otherwise.
pub const DEFAULT_REDIRECT_HOPS: u32 = 3;

/// Upper bound on concurrently running target fetches in a batch.
/// Batches larger than this queue instead of spawning more workers.
pub const DEFAULT_MAX_WORKERS: usize = 100;

/// Status codes treated as redirects (inclusive 300, exclusive 400).
pub const REDIRECT_STATUS_RANGE: Range<u16> = 300..400;

/// Message used for error findings produced by a transport timeout.
pub const TIMEOUT_MESSAGE: &str = "Timeout occurred";

/// Pattern recognising an explicit URL scheme prefix (`scheme://`).
pub const URL_SCHEME_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9+.\-]*://";

/// User-Agent values sent with requests, one picked at random per request.
///
/// Rotating between a few common browser strings avoids naive user-agent
/// based blocking. The choice carries no other meaning.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) AppleWebKit/537.36 (KHTML, like Gecko)",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)",
    "Mozilla/5.0 (Windows NT 6.4; WOW64) AppleWebKit/537.36 (KHTML, like Gecko)",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:61.0) Gecko/20100101 Firefox/61.0",
];
