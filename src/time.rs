//! Minute-of-day values and the time filter pushed by the slider control.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::TrafficError;

/// Number of minute slots in a day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// A local time of day at minute precision, always in `0..1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub const MIDNIGHT: MinuteOfDay = MinuteOfDay(0);

    pub fn new(minute: u16) -> Result<Self, TrafficError> {
        if minute < MINUTES_PER_DAY {
            Ok(Self(minute))
        } else {
            Err(TrafficError::MinuteOutOfRange(minute.into()))
        }
    }

    /// Takes the wall-clock hour and minute of `time`, discarding date and seconds.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Slot position in a per-minute table.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Short 12-hour clock label, e.g. `8:05 AM`.
    pub fn label(self) -> String {
        let hour = u32::from(self.0 / 60);
        let minute = u32::from(self.0 % 60);
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(|t| t.format("%-I:%M %p").to_string())
            .unwrap_or_default()
    }
}

impl TryFrom<i64> for MinuteOfDay {
    type Error = TrafficError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .filter(|m| *m < MINUTES_PER_DAY)
            .map(MinuteOfDay)
            .ok_or(TrafficError::MinuteOutOfRange(value))
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Filter state of the slider.
///
/// The control surface serializes [`TimeFilter::Unfiltered`] as `-1`; inside
/// the crate it is a separate variant so no arithmetic ever touches it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum TimeFilter {
    #[default]
    Unfiltered,
    Minute(MinuteOfDay),
}

impl TimeFilter {
    /// Value sent by the control for "any time".
    pub const UNFILTERED_CONTROL: i64 = -1;

    /// Converts a raw control value (`-1` or a minute of day).
    pub fn from_control(value: i64) -> Result<Self, TrafficError> {
        if value == Self::UNFILTERED_CONTROL {
            return Ok(TimeFilter::Unfiltered);
        }
        MinuteOfDay::try_from(value)
            .map(TimeFilter::Minute)
            .map_err(|_| TrafficError::FilterOutOfRange(value))
    }

    pub fn to_control(self) -> i64 {
        match self {
            TimeFilter::Unfiltered => Self::UNFILTERED_CONTROL,
            TimeFilter::Minute(m) => m.get().into(),
        }
    }

    pub fn is_filtered(self) -> bool {
        matches!(self, TimeFilter::Minute(_))
    }
}

impl From<TimeFilter> for i64 {
    fn from(filter: TimeFilter) -> Self {
        filter.to_control()
    }
}

impl TryFrom<i64> for TimeFilter {
    type Error = TrafficError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        TimeFilter::from_control(value)
    }
}

/// Accepts `-1`, `any`, a minute of day (`485`) or a 24-hour clock time (`08:05`).
impl FromStr for TimeFilter {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") {
            return Ok(TimeFilter::Unfiltered);
        }
        if s.contains(':') {
            let time = NaiveTime::parse_from_str(s, "%H:%M")
                .map_err(|_| TrafficError::InvalidFilter(s.to_string()))?;
            return Ok(TimeFilter::Minute(MinuteOfDay::from_time(&time)));
        }
        let value: i64 = s
            .parse()
            .map_err(|_| TrafficError::InvalidFilter(s.to_string()))?;
        TimeFilter::from_control(value)
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFilter::Unfiltered => f.write_str("(any time)"),
            TimeFilter::Minute(m) => f.write_str(&m.label()),
        }
    }
}
