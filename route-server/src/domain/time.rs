//! Time handling for timetabled services.
//!
//! Timetables publish a bare time-of-day per stop ("04:03"). A traveller,
//! however, lives on a calendar: the same "00:10" can mean tonight or
//! tomorrow depending on when they reach the platform. [`ScheduledTime`] is
//! the published value and [`RailTime`] is the resolved, date-aware instant.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

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
}

/// A published time-of-day with no date attached.
///
/// # Examples
///
/// ```
/// use route_server::domain::ScheduledTime;
///
/// let t = ScheduledTime::parse("04:03").unwrap();
/// assert_eq!(t.to_string(), "04:03");
///
/// // Single-digit hours appear in some source files
/// assert_eq!(ScheduledTime::parse("4:03").unwrap(), t);
///
/// assert!(ScheduledTime::parse("24:00").is_err());
/// assert!(ScheduledTime::parse("0403").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduledTime(NaiveTime);

impl ScheduledTime {
    /// Parse "HH:MM" (or "H:MM").
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        let (hours, minutes) = s
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let hour = parse_digits(hours).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute =
            parse_digits(minutes).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Build from hour and minute, if in range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Returns the underlying time-of-day.
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Minutes since midnight.
    pub fn minutes_of_day(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }
}

impl fmt::Debug for ScheduledTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScheduledTime({self})")
    }
}

impl fmt::Display for ScheduledTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

/// A date-aware instant on the service calendar.
///
/// # Examples
///
/// ```
/// use route_server::domain::{RailTime, ScheduledTime};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
/// let ready = RailTime::parse_iso("2025-06-14T23:50").unwrap();
///
/// // A 00:10 departure seen at 23:50 is tomorrow's
/// let dep = ready.resolve_on_or_after(ScheduledTime::parse("00:10").unwrap()).unwrap();
/// assert_eq!(dep.date(), date.succ_opt().unwrap());
/// assert_eq!(dep.to_string(), "00:10");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RailTime {
    date: NaiveDate,
    time: NaiveTime,
}

impl RailTime {
    /// Create a new RailTime from date and time components.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Create from a `NaiveDateTime`.
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            date: dt.date(),
            time: dt.time(),
        }
    }

    /// Parse "YYYY-MM-DDTHH:MM" (seconds are accepted and kept).
    pub fn parse_iso(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .map(Self::from_datetime)
            .map_err(|_| TimeError::new("expected YYYY-MM-DDTHH:MM"))
    }

    /// Returns the date component.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time component.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Converts to a NaiveDateTime.
    pub fn to_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Resolve a published time-of-day to the first instant at or after `self`.
    ///
    /// The time is placed on `self`'s date; if that lands before `self`, it
    /// moves to the following day. The result is never earlier than `self`.
    /// Returns `None` only on calendar overflow.
    pub fn resolve_on_or_after(&self, scheduled: ScheduledTime) -> Option<Self> {
        let candidate = Self::new(self.date, scheduled.time());
        if candidate >= *self {
            return Some(candidate);
        }
        Some(Self::new(self.date.succ_opt()?, scheduled.time()))
    }

    /// Add a duration, advancing the date across midnight.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        self.to_datetime()
            .checked_add_signed(duration)
            .map(Self::from_datetime)
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.to_datetime()
            .signed_duration_since(other.to_datetime())
    }

    /// Formats as "YYYY-MM-DDTHH:MM".
    pub fn to_iso(&self) -> String {
        self.to_datetime().format("%Y-%m-%dT%H:%M").to_string()
    }
}

impl Add<Duration> for RailTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add(rhs).expect("time overflow")
    }
}

impl Ord for RailTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_datetime().cmp(&other.to_datetime())
    }
}

impl PartialOrd for RailTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RailTime({} {:02}:{:02})",
            self.date,
            self.time.hour(),
            self.time.minute()
        )
    }
}

impl fmt::Display for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.time.hour(), self.time.minute())
    }
}

/// Parse one or two ASCII digits.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(s: &str) -> RailTime {
        RailTime::parse_iso(s).unwrap()
    }

    fn tod(s: &str) -> ScheduledTime {
        ScheduledTime::parse(s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        assert_eq!(tod("00:00").minutes_of_day(), 0);
        assert_eq!(tod("23:59").minutes_of_day(), 23 * 60 + 59);
        assert_eq!(tod(" 05:06 ").minutes_of_day(), 5 * 60 + 6);
        assert_eq!(tod("7:30"), tod("07:30"));
    }

    #[test]
    fn parse_invalid_format() {
        assert!(ScheduledTime::parse("").is_err());
        assert!(ScheduledTime::parse("1430").is_err());
        assert!(ScheduledTime::parse("14:3").is_err());
        assert!(ScheduledTime::parse("143:00").is_err());
        assert!(ScheduledTime::parse(":30").is_err());
        assert!(ScheduledTime::parse("ab:cd").is_err());
        assert!(ScheduledTime::parse("-1:30").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(ScheduledTime::parse("24:00").is_err());
        assert!(ScheduledTime::parse("12:60").is_err());
    }

    #[test]
    fn parse_iso() {
        let t = at("2025-06-14T04:00");
        assert_eq!(t.date(), date(2025, 6, 14));
        assert_eq!(t.to_string(), "04:00");
        assert_eq!(t.to_iso(), "2025-06-14T04:00");
        assert_eq!(at("2025-06-14T04:00:00"), t);
        assert!(RailTime::parse_iso("2025-06-14 04:00").is_err());
        assert!(RailTime::parse_iso("04:00").is_err());
    }

    #[test]
    fn resolve_same_day() {
        let ready = at("2025-06-14T04:00");
        let dep = ready.resolve_on_or_after(tod("04:03")).unwrap();
        assert_eq!(dep, at("2025-06-14T04:03"));
    }

    #[test]
    fn resolve_exact_instant_is_same_day() {
        let ready = at("2025-06-14T04:03");
        assert_eq!(ready.resolve_on_or_after(tod("04:03")).unwrap(), ready);
    }

    #[test]
    fn resolve_earlier_time_rolls_to_next_day() {
        let ready = at("2025-06-14T04:05");
        let dep = ready.resolve_on_or_after(tod("04:03")).unwrap();
        assert_eq!(dep, at("2025-06-15T04:03"));
    }

    #[test]
    fn resolve_across_midnight() {
        let ready = at("2025-12-31T23:50");
        let dep = ready.resolve_on_or_after(tod("00:10")).unwrap();
        assert_eq!(dep, at("2026-01-01T00:10"));
        assert_eq!(dep.signed_duration_since(ready), Duration::minutes(20));
    }

    #[test]
    fn add_duration_crosses_midnight() {
        let later = at("2025-06-14T23:30") + Duration::hours(1);
        assert_eq!(later.to_string(), "00:30");
        assert_eq!(later.date(), date(2025, 6, 15));
    }

    #[test]
    fn ordering_uses_date() {
        assert!(at("2025-06-15T00:10") > at("2025-06-14T23:50"));
        assert!(at("2025-06-14T10:00") < at("2025-06-14T10:01"));
    }

    #[test]
    fn debug_format() {
        assert_eq!(
            format!("{:?}", at("2025-06-14T04:03")),
            "RailTime(2025-06-14 04:03)"
        );
        assert_eq!(format!("{:?}", tod("04:03")), "ScheduledTime(04:03)");
    }
}
