//! Time-of-day handling for schedules.
//!
//! Schedules store their first departure of the day as an "HH:MM" string.
//! This module parses those strings into a typed anchor and formats
//! instants back into the same 24-hour form for responses.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serializer;
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// Short description of what was wrong with the input.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// The fixed time of day a schedule repeats from.
///
/// # Examples
///
/// ```
/// use bus_server::domain::DepartureAnchor;
///
/// let anchor = DepartureAnchor::parse_hhmm("06:30").unwrap();
/// assert_eq!(anchor.hour(), 6);
/// assert_eq!(anchor.minute(), 30);
/// assert_eq!(anchor.to_string(), "06:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepartureAnchor {
    time: NaiveTime,
}

impl DepartureAnchor {
    /// Parse an anchor from strict "HH:MM" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_server::domain::DepartureAnchor;
    ///
    /// assert!(DepartureAnchor::parse_hhmm("00:00").is_ok());
    /// assert!(DepartureAnchor::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(DepartureAnchor::parse_hhmm("0630").is_err());
    /// assert!(DepartureAnchor::parse_hhmm("6:30").is_err());
    /// assert!(DepartureAnchor::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let &[h1, h2, b':', m1, m2] = s.as_bytes() else {
            return Err(TimeError::new("expected HH:MM format"));
        };

        let hour = digit_pair(h1, h2).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = digit_pair(m1, m2).ok_or_else(|| TimeError::new("invalid minute digits"))?;

        let time = match (hour, minute) {
            (24.., _) => return Err(TimeError::new("hour must be 0-23")),
            (_, 60..) => return Err(TimeError::new("minute must be 0-59")),
            (h, m) => NaiveTime::from_hms_opt(h, m, 0),
        };

        time.map(|time| Self { time })
            .ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// The anchor's occurrence on a given calendar date, seconds zeroed.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.time)
    }
}

impl FromStr for DepartureAnchor {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Debug for DepartureAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DepartureAnchor({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for DepartureAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Format an instant as zero-padded 24-hour "HH:MM", dropping seconds.
pub fn format_hhmm(instant: NaiveDateTime) -> String {
    format!("{:02}:{:02}", instant.hour(), instant.minute())
}

/// Serde helper writing an instant as "HH:MM".
pub fn serialize_hhmm<S: Serializer>(instant: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_hhmm(*instant))
}

fn digit_pair(tens: u8, units: u8) -> Option<u32> {
    match (tens, units) {
        (b'0'..=b'9', b'0'..=b'9') => Some(u32::from(tens - b'0') * 10 + u32::from(units - b'0')),
        _ => None,
    }
}
