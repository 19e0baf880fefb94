// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamp helpers.
//!
//! All persisted timestamps are UTC RFC 3339 with fixed millisecond precision
//! and a `Z` suffix, so string comparison orders the same way as time
//! comparison. Do not mix formats in the database.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ConciergeError;

/// Format a UTC instant as a storage timestamp.
pub fn fmt_ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current instant as a storage timestamp.
pub fn now_ts() -> String {
    fmt_ts(Utc::now())
}

/// Parse a storage timestamp back into a UTC instant.
pub fn parse_ts(s: &str) -> Result<DateTime<Utc>, ConciergeError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ConciergeError::Internal(format!("invalid timestamp `{s}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fmt_ts_is_fixed_width_z() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(fmt_ts(dt), "2026-03-01T09:30:00.000Z");
    }

    #[test]
    fn roundtrip() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(parse_ts(&fmt_ts(dt)).unwrap(), dt);
    }

    #[test]
    fn lexicographic_order_matches_time_order() {
        let a = fmt_ts(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
        let b = fmt_ts(Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap());
        assert!(a < b);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_ts("not a time").is_err());
    }
}
