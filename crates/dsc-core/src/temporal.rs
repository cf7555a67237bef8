//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines [`Timestamp`], a UTC timestamp truncated to whole seconds, and the
//! [`Clock`] trait through which assembly reads the current time.
//!
//! ## Invariant
//!
//! Every timestamp written into a credential renders as
//! `YYYY-MM-DDTHH:MM:SSZ`: no sub-seconds, no `+00:00`, always `Z`.
//!
//! ## Parsing
//!
//! [`Timestamp::parse_iso8601()`] is deliberately lenient because it is also
//! used to check dates found in third-party documents. It accepts RFC 3339
//! with any offset (converted to UTC), minute-precision date-times, basic
//! `+hhmm` offsets, naive date-times (taken as UTC) and bare calendar dates
//! (taken as midnight UTC).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Date-times with an offset; `%#z` takes `+hh:mm`, `+hhmm` and `+hh`.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Date-times without an offset, taken as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
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

    /// Parse an ISO 8601 timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] when none of the
    /// accepted forms match.
    pub fn parse_iso8601(s: &str) -> Result<Self, ValidationError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_utc(dt.with_timezone(&Utc)));
        }
        let offset_form = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
            Some(rest) => format!("{rest}+00:00"),
            None => s.to_string(),
        };
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&offset_form, fmt) {
                return Ok(Self::from_utc(dt.with_timezone(&Utc)));
            }
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::from_utc(naive.and_utc()));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Self::from_utc(midnight.and_utc()));
            }
        }
        Err(ValidationError::InvalidTimestamp {
            value: s.to_string(),
            reason: "expected ISO 8601 date or date-time".to_string(),
        })
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse_iso8601(&raw).map_err(serde::de::Error::custom)
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Source of "now" for credential assembly.
pub trait Clock: Send + Sync {
    /// The current instant, already truncated to whole seconds.
    fn now(&self) -> Timestamp;
}

/// Production [`Clock`] reading the system UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A [`Clock`] frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Rendering then parsing returns the same instant.
        #[test]
        fn iso8601_roundtrip(secs in 0i64..4_102_444_800) {
            let dt = DateTime::from_timestamp(secs, 0).unwrap();
            let ts = Timestamp::from_utc(dt);
            let parsed = Timestamp::parse_iso8601(&ts.to_iso8601()).unwrap();
            prop_assert_eq!(parsed, ts);
        }
    }
}
