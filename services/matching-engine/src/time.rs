//! Wall-clock helper

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as Unix milliseconds
///
/// Order timestamps are arrival tags; ties within a price level are broken
/// by queue position, so millisecond resolution is enough.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
