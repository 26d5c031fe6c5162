//! Calendar day and bookable unit identities.
//!
//! Every key is built from local calendar fields (`NaiveDate`), never by
//! slicing a UTC timestamp, so `2024-06-10` means the same day everywhere in
//! the engine.

use crate::time_slots::TimeSlot;
use chrono::{DateTime, Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

lazy_static! {
    static ref DATE_KEY: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
    static ref SLOT_KEY: Regex = Regex::new(r"^(\d{4}-\d{2}-\d{2})-(\d{2}:\d{2})$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("Invalid date key `{0}`, expected YYYY-MM-DD")]
    DateKey(String),
    #[error("Invalid slot key `{0}`, expected YYYY-MM-DD-HH:MM")]
    SlotKey(String),
    #[error("Invalid time slot `{0}`, expected HH:MM")]
    TimeSlot(String),
}

/// Canonical `YYYY-MM-DD` identity of a local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today in the client's local calendar.
    pub fn today() -> Self {
        Self::from_local(&Local::now())
    }

    pub fn from_local(datetime: &DateTime<Local>) -> Self {
        Self(datetime.date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `count` consecutive days starting with (and including) this one.
    pub fn range(&self, count: u32) -> Vec<DateKey> {
        self.0.iter_days().take(count as usize).map(Self).collect()
    }

    pub fn slot(&self, time: TimeSlot) -> SlotKey {
        SlotKey { date: *self, time }
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for DateKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || KeyParseError::DateKey(s.to_string());
        let captures = DATE_KEY.captures(s).ok_or_else(invalid)?;
        let field = |index: usize| captures[index].parse::<u32>().map_err(|_| invalid());

        let year = field(1)? as i32;
        DateKey::from_ymd(year, field(2)?, field(3)?).ok_or_else(invalid)
    }
}

impl TryFrom<String> for DateKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

/// `DateKey-HH:MM`, one bookable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotKey {
    pub date: DateKey,
    pub time: TimeSlot,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date, self.time)
    }
}

impl FromStr for SlotKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || KeyParseError::SlotKey(s.to_string());
        let captures = SLOT_KEY.captures(s).ok_or_else(invalid)?;

        let date = captures[1].parse::<DateKey>().map_err(|_| invalid())?;
        let time = captures[2].parse::<TimeSlot>().map_err(|_| invalid())?;
        Ok(SlotKey { date, time })
    }
}

impl TryFrom<String> for SlotKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotKey> for String {
    fn from(key: SlotKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, TimeZone};
    use test_case::test_case;

    #[test_case("2024-06-10")]
    #[test_case("2024-02-29")]
    #[test_case("1999-12-31")]
    #[test_case("2025-01-01")]
    fn test_date_key_reformats_identically(input: &str) {
        let key: DateKey = input.parse().unwrap();
        assert_eq!(key.to_string(), input);
    }

    #[test_case("2024-6-10" ; "unpadded month")]
    #[test_case("2023-02-29" ; "no leap day")]
    #[test_case("2024-06-10T00:00:00Z" ; "iso timestamp")]
    #[test_case("" ; "empty")]
    fn test_reject_malformed_date_key(input: &str) {
        assert_eq!(
            input.parse::<DateKey>().unwrap_err(),
            KeyParseError::DateKey(input.into())
        );
    }

    #[test]
    fn test_local_midnight_round_trip() {
        let start = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for offset in 0..400 {
            let datetime = start + Duration::days(offset);
            let key = DateKey::from_local(&datetime);
            let reparsed: DateKey = key.to_string().parse().unwrap();
            assert_eq!(reparsed, key);
            assert_eq!(reparsed.to_string(), key.to_string());
        }
    }

    #[test]
    fn test_late_evening_stays_on_local_day() {
        let evening = Local.with_ymd_and_hms(2024, 6, 10, 23, 30, 0).unwrap();
        assert_eq!(DateKey::from_local(&evening).to_string(), "2024-06-10");
    }

    #[test]
    fn test_range_crosses_month_end() {
        let start = DateKey::from_ymd(2024, 2, 28).unwrap();
        let dates: Vec<String> = start.range(3).iter().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
        assert!(start.range(0).is_empty());
    }

    #[test]
    fn test_slot_key_format_and_parse() {
        let date = DateKey::from_ymd(2024, 6, 10).unwrap();
        let key = date.slot("09:30".parse().unwrap());
        assert_eq!(key.to_string(), "2024-06-10-09:30");
        assert_eq!("2024-06-10-09:30".parse::<SlotKey>().unwrap(), key);

        "2024-06-10-9:30".parse::<SlotKey>().unwrap_err();
        "2024-06-10 09:30".parse::<SlotKey>().unwrap_err();
        "2024-06-10-25:00".parse::<SlotKey>().unwrap_err();
    }

    #[test]
    fn test_serde_uses_canonical_strings() {
        let key = DateKey::from_ymd(2024, 6, 10).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-06-10\"");
        let slot: SlotKey = serde_json::from_str("\"2024-06-10-14:00\"").unwrap();
        assert_eq!(slot.date, key);
        serde_json::from_str::<DateKey>("\"10.06.2024\"").unwrap_err();
    }
}
