//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

use crate::settings::transport::BackoffPolicy;

/// Delay before the next attempt once `failed` attempts have failed.
///
/// The first retry waits `base_delay_ms`, each later one doubles it, and
/// the result never exceeds `max_delay_ms` before up to 10% jitter is added.
pub fn calculate_backoff(failed: u32, policy: &BackoffPolicy) -> Duration {
    let Some(doublings) = failed.checked_sub(1) else {
        return Duration::ZERO;
    };

    // A shift of 64 or more overflows; the cap below applies either way.
    let factor = 1u64.checked_shl(doublings).unwrap_or(u64::MAX);
    let delay_ms = policy
        .base_delay_ms
        .saturating_mul(factor)
        .min(policy.max_delay_ms);

    let jitter_ms = rand::thread_rng().gen_range(0..=delay_ms / 10);
    Duration::from_millis(delay_ms + jitter_ms)
}
