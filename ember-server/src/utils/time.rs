//! Time utilities

use chrono::Utc;

/// Current time as Unix timestamp milliseconds
///
/// All persisted timestamps use this representation.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Day bucket key (YYYY-MM-DD, UTC) for a millisecond timestamp
///
/// Used by the analytics trend aggregation.
pub fn day_key(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_key() {
        // 2024-01-15T12:30:00Z
        assert_eq!(day_key(1_705_321_800_000), "2024-01-15");
    }
}
