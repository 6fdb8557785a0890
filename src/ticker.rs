use chrono::{DateTime, Local};
use std::time::Duration;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// How long the event loop may block: until the next scheduled callback,
/// but never longer than one tick
pub fn poll_timeout(next_due: Option<DateTime<Local>>, now: DateTime<Local>) -> Duration {
    let tick = tick_duration();
    match next_due {
        Some(due) if due <= now => Duration::ZERO,
        Some(due) => (due - now).to_std().map_or(tick, |wait| wait.min(tick)),
        None => tick,
    }
}
