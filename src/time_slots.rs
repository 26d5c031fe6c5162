use crate::date_key::KeyParseError;
use chrono::{NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

lazy_static! {
    static ref TIME_SLOT: Regex = Regex::new(r"^(\d{2}):(\d{2})$").unwrap();
}

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Start time of a bookable slot, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::from_hm(minutes / 60, minutes % 60)
    }

    /// Minutes since local midnight.
    pub fn minutes(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for TimeSlot {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || KeyParseError::TimeSlot(s.to_string());
        let captures = TIME_SLOT.captures(s).ok_or_else(invalid)?;
        let hour = captures[1].parse::<u32>().map_err(|_| invalid())?;
        let minute = captures[2].parse::<u32>().map_err(|_| invalid())?;
        TimeSlot::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

/// Slots every `interval_minutes` from `start_hour:00` up to (exclusive)
/// `end_hour:00`, skipping slots that start inside `[break_start:00, break_end:00)`.
///
/// Every slot fits the window in full; a trailing step that would run past
/// `end_hour:00` is left out. An empty break (`break_start >= break_end`)
/// excludes nothing. A zero interval yields no slots.
pub fn generate(
    start_hour: u32,
    end_hour: u32,
    break_start: u32,
    break_end: u32,
    interval_minutes: u32,
) -> Vec<TimeSlot> {
    if interval_minutes == 0 {
        return vec![];
    }

    let window_end = (end_hour * 60).min(MINUTES_PER_DAY);
    let Some(last_start) = window_end.checked_sub(interval_minutes) else {
        return vec![];
    };
    let break_window = (break_start * 60)..(break_end * 60);

    (start_hour * 60..=last_start)
        .step_by(interval_minutes as usize)
        .filter(|minute| !break_window.contains(minute))
        .filter_map(TimeSlot::from_minutes)
        .collect()
}
