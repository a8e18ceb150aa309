use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Add;
use std::str::FromStr;
use thiserror::Error;

/// Format used on the wire when submitting flights: UTC without an offset.
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub type Interval = (Time, Time);

/// A UTC instant. Every timestamp entering the planner is normalized to UTC:
/// offsets are converted, naive timestamps are taken as already being UTC.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash)]
pub struct Time(pub DateTime<Utc>);

#[derive(Debug, Error, PartialEq)]
#[error("invalid timestamp '{0}', expected YYYY-MM-DDTHH:MM[:SS] (UTC) or RFC 3339")]
pub struct TimeParseError(pub String);

impl Time {
    /// Strict overlap: intervals that only touch at an endpoint do not overlap.
    pub fn overlaps(time: &Interval, window: &Interval) -> bool {
        time.1 > window.0 && time.0 < window.1
    }

    pub fn from_naive(naive: NaiveDateTime) -> Time {
        Time(naive.and_utc())
    }
}

impl FromStr for Time {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Time(dt.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(Time::from_naive)
            .ok_or_else(|| TimeParseError(s.to_string()))
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.format(WIRE_FORMAT))
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Time(self.0 + rhs)
    }
}

/// The displayed day: `[start, start + 24h)` where `start` is UTC midnight of
/// `date` shifted by a whole number of hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: Time,
    pub end: Time,
}

impl DayWindow {
    pub fn new(date: NaiveDate, offset_hours: i64) -> DayWindow {
        let start = Time::from_naive(date.and_time(NaiveTime::MIN)) + Duration::hours(offset_hours);
        DayWindow {
            date,
            start,
            end: start + Duration::hours(24),
        }
    }

    pub fn interval(&self) -> Interval {
        (self.start, self.end)
    }

    pub fn overlaps(&self, interval: &Interval) -> bool {
        Time::overlaps(interval, &self.interval())
    }

    pub fn clip(&self, start: Time, end: Time) -> Interval {
        (start.max(self.start), end.min(self.end))
    }
}
