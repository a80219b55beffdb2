//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

/// Calculate exponential backoff delay with jitter.
///
/// `attempt` is the 1-based index of the attempt that just failed, so the
/// first delay is `base_ms`, the second `base_ms * multiplier`, and so on,
/// capped at `max_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, multiplier: u32, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential = u64::from(multiplier).saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
