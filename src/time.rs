//! Wall-clock arithmetic on `HH:MM` strings.
//!
//! A day is 1440 minutes. A range whose end is at or before its start wraps
//! past midnight, so a range with equal ends covers the whole day.

use chrono::{DateTime, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    #[error("invalid time '{0}' (expected HH:MM)")]
    Format(String),
    #[error("time {hour:02}:{minute:02} is out of range")]
    OutOfRange { hour: u32, minute: u32 },
}

/// A zero-padded 24-hour wall-clock time, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 || minute > 59 {
            return Err(TimeError::OutOfRange { hour, minute });
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Wraps any minute count into `[0, 1440)` with floor-modulo.
    pub fn from_minutes(minutes: i64) -> Self {
        Self(minutes.rem_euclid(i64::from(MINUTES_PER_DAY)) as u16)
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// The `HHMM` integer the schedule document is ordered by.
    pub fn sort_key(self) -> u32 {
        self.hour() * 100 + self.minute()
    }

    /// Wall-clock time of `instant` as seen in `zone`, seconds dropped.
    pub fn at<Z: TimeZone>(instant: DateTime<Utc>, zone: &Z) -> Self {
        Self::from(instant.with_timezone(zone).time())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let bytes = input.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
        if !well_formed {
            return Err(TimeError::Format(input.to_string()));
        }
        let digit = |i: usize| u32::from(bytes[i] - b'0');
        Self::from_hm(digit(0) * 10 + digit(1), digit(3) * 10 + digit(4))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(value: NaiveTime) -> Self {
        Self((value.hour() * 60 + value.minute()) as u16)
    }
}

pub fn time_to_minutes(time: &str) -> Result<u32, TimeError> {
    time.parse::<ClockTime>().map(ClockTime::minutes)
}

pub fn minutes_to_time(minutes: i64) -> String {
    ClockTime::from_minutes(minutes).to_string()
}

pub fn is_overnight(start: ClockTime, end: ClockTime) -> bool {
    end <= start
}

/// Length of `start..end` in minutes; overnight ranges add a full day.
pub fn span_minutes(start: ClockTime, end: ClockTime) -> u32 {
    if is_overnight(start, end) {
        end.minutes() + MINUTES_PER_DAY - start.minutes()
    } else {
        end.minutes() - start.minutes()
    }
}
