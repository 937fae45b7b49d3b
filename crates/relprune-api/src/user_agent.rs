//! Browser-like user agents, one picked per process.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::OnceLock;

/// Candidate user agents.
pub const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) discord/1.0.9153 Chrome/124.0.6367.243 Electron/30.1.0 Safari/537.36",
];

static SELECTED: OnceLock<&'static str> = OnceLock::new();

/// The user agent for this process. Chosen on first call, then fixed.
pub fn user_agent() -> &'static str {
    SELECTED.get_or_init(|| pick_user_agent(&mut rand::thread_rng()))
}

/// Picks one of [`USER_AGENTS`] uniformly.
pub fn pick_user_agent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USER_AGENTS.choose(rng).copied().unwrap_or(USER_AGENTS[0])
}
