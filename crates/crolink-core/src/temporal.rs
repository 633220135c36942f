//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds
//! precision. Submission audit trails, workflow timestamps
//! (`submitted_at`, `approved_at`, `completed_at`), and derived
//! completion dates all use this type, so the same instant renders as
//! the same string in every surface that displays it.
//!
//! Non-UTC inputs are rejected at construction by the strict parser —
//! there is no silent conversion. `parse_lenient` exists for ingesting
//! external data (CRO-side uploads, migrated records) and normalizes to
//! UTC.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
/// - [`Timestamp::parse_lenient()`] — from an ISO8601 string, converting to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO8601 string.
    ///
    /// **Rejects non-UTC inputs.** Only timestamps with the `Z` suffix
    /// are accepted — even `+00:00`, which is semantically equivalent,
    /// is rejected so that every stored timestamp has one spelling.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid RFC 3339 or uses a
    /// non-Z timezone offset.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }

        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            CoreError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Parse a timestamp from an RFC 3339 string, accepting any timezone
    /// offset and converting to UTC.
    ///
    /// Lenient parser for ingesting external data. The result is always
    /// UTC with seconds precision, matching the strict invariant.
    pub fn parse_lenient(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            CoreError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// The timestamp `days` whole days after this one.
    ///
    /// Used to derive `estimated_completion_date` from a quoted
    /// turnaround. Saturates at the chrono range limit rather than
    /// wrapping.
    pub fn plus_days(&self, days: u32) -> Self {
        match self.0.checked_add_signed(Duration::days(i64::from(days))) {
            Some(dt) => Self(dt),
            None => Self(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-03-01T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 45).unwrap();
        let with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(with_nanos);
        assert_eq!(ts.to_iso8601(), "2026-03-01T09:30:45Z");
    }

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_parse_offset_rejected() {
        assert!(Timestamp::parse("2026-03-01T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-03-01T17:00:00+05:00").is_err());
        assert!(Timestamp::parse("2026-03-01T08:00:00-04:00").is_err());
    }

    #[test]
    fn test_parse_subseconds_truncated() {
        let ts = Timestamp::parse("2026-03-01T12:00:00.987654Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2026-03-01").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_parse_lenient_converts_offset() {
        let ts = Timestamp::parse_lenient("2026-03-01T17:00:00+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_plus_days() {
        let ts = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        assert_eq!(ts.plus_days(14).to_iso8601(), "2026-03-15T12:00:00Z");
        assert_eq!(ts.plus_days(0), ts);
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        let later = Timestamp::parse("2026-03-01T12:00:01Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_display_matches_iso8601() {
        let ts = Timestamp::parse("2026-06-30T23:59:59Z").unwrap();
        assert_eq!(format!("{ts}"), ts.to_iso8601());
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The strict parser never accepts a string without a Z suffix.
        #[test]
        fn strict_parse_requires_z(s in "[0-9T:+.-]{0,30}") {
            if !s.ends_with('Z') {
                prop_assert!(Timestamp::parse(&s).is_err());
            }
        }

        /// Whatever parses strictly re-renders to a string that parses
        /// back to the same instant.
        #[test]
        fn parse_render_roundtrip(secs in 0i64..4_102_444_800) {
            let dt = DateTime::from_timestamp(secs, 0).unwrap();
            let ts = Timestamp::from_utc(dt);
            let reparsed = Timestamp::parse(&ts.to_iso8601()).unwrap();
            prop_assert_eq!(ts, reparsed);
        }
    }
}
