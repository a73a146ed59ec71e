//! # Temporal Codecs: ISO-8601 Dates and Datetimes
//!
//! Rendering and parsing for the `date` and `datetime` primitive kinds.
//!
//! ## Offset Policy
//!
//! A datetime is marshalled exactly as provided. No UTC is assumed or
//! injected:
//!
//! - a naive value renders as `2026-01-15T12:30:45.123456` and parses back
//!   as naive;
//! - an offset-aware value renders with its own offset,
//!   `2026-01-15T12:30:45+05:30`, and parses back with that offset.
//!
//! Fractional seconds are rendered only when non-zero, using the shortest of
//! millisecond, microsecond, or nanosecond precision that is exact.
//!
//! Parsing accepts either `T` or a single space between date and time, an
//! optional fraction, and an optional `Z` or `±HH:MM` offset.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, ParseError, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}

/// A datetime value, with or without a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeValue {
    /// Wall-clock time with no offset information.
    Naive(NaiveDateTime),
    /// A fixed instant with the offset it was recorded in.
    Offset(DateTime<FixedOffset>),
}

impl DateTimeValue {
    /// Render as ISO-8601 without any timezone conversion.
    pub fn to_iso8601(&self) -> String {
        match self {
            Self::Naive(dt) => dt.format(NAIVE_FORMAT).to_string(),
            Self::Offset(dt) => dt.format(OFFSET_FORMAT).to_string(),
        }
    }

    /// Parse an ISO-8601 datetime. Inputs carrying an offset produce
    /// `Offset`, inputs without one produce `Naive`.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let normalized = normalize_separator(s);
        match DateTime::parse_from_rfc3339(&normalized) {
            Ok(dt) => Ok(Self::Offset(dt)),
            Err(offset_err) => match NaiveDateTime::parse_from_str(&normalized, NAIVE_FORMAT) {
                Ok(dt) => Ok(Self::Naive(dt)),
                // Report the offset-aware failure when the text clearly tried
                // to carry an offset.
                Err(naive_err) => {
                    if has_offset_suffix(&normalized) {
                        Err(offset_err)
                    } else {
                        Err(naive_err)
                    }
                }
            },
        }
    }

    /// Returns true if this value carries no offset.
    pub fn is_naive(&self) -> bool {
        matches!(self, Self::Naive(_))
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<NaiveDateTime> for DateTimeValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Naive(dt)
    }
}

impl From<DateTime<FixedOffset>> for DateTimeValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Offset(dt)
    }
}

impl From<DateTime<Utc>> for DateTimeValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Offset(dt.into())
    }
}

/// `2026-01-15 12:00:00` → `2026-01-15T12:00:00`.
fn normalize_separator(s: &str) -> Cow<'_, str> {
    if s.len() > 11 && s.as_bytes()[10] == b' ' {
        Cow::Owned(format!("{}T{}", &s[..10], &s[11..]))
    } else {
        Cow::Borrowed(s)
    }
}

fn has_offset_suffix(s: &str) -> bool {
    if s.ends_with('Z') || s.ends_with('z') {
        return true;
    }
    // Look for a sign inside the time part only; the date part has dashes.
    s.get(11..)
        .map(|time| time.contains('+') || time.contains('-'))
        .unwrap_or(false)
}
