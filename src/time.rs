//! Wall-clock helpers.

use chrono::{DateTime, Utc};

/// Milliseconds since the Unix epoch, right now.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Milliseconds since the Unix epoch of `time`, or of right now when `time`
/// is absent.
///
/// Falling back to the wall clock can order points out of sequence relative
/// to their timestamped neighbours. That is accepted silently.
#[inline]
pub fn epoch_ms_or_now(time: Option<&DateTime<Utc>>) -> i64 {
    match time {
        Some(t) => t.timestamp_millis(),
        None => now_ms(),
    }
}
