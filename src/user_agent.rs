//! User-Agent selection.
//!
//! Every request carries one User-Agent drawn at random from a small fixed
//! pool of browser strings.

use rand::seq::IndexedRandom;

use crate::config::USER_AGENTS;

/// Fallback used only if the pool is ever emptied.
const FALLBACK_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Picks a User-Agent for the next request.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(FALLBACK_USER_AGENT)
}
