use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of half-hour slots in a 24-hour day.
pub const TIME_SLOT_COUNT: u8 = 48;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainParseError {
    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),
    #[error("'{0}' is not a half-hour time slot")]
    UnknownTimeSlot(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeZone {
    Eastern,
    Central,
    Mountain,
    Pacific,
    Alaskan,
    Hawaiian,
}

impl TimeZone {
    pub const ALL: [TimeZone; 6] = [
        TimeZone::Eastern,
        TimeZone::Central,
        TimeZone::Mountain,
        TimeZone::Pacific,
        TimeZone::Alaskan,
        TimeZone::Hawaiian,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeZone::Eastern => "Eastern",
            TimeZone::Central => "Central",
            TimeZone::Mountain => "Mountain",
            TimeZone::Pacific => "Pacific",
            TimeZone::Alaskan => "Alaskan",
            TimeZone::Hawaiian => "Hawaiian",
        }
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeZone {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TimeZone::ALL
            .into_iter()
            .find(|zone| zone.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainParseError::UnknownTimeZone(s.to_string()))
    }
}

/// A half-hour slot of the day, `0` being `12:00 AM` and `47` being `11:30 PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(u8);

impl TimeSlot {
    pub fn new(index: u8) -> Option<Self> {
        (index < TIME_SLOT_COUNT).then_some(Self(index))
    }

    pub fn at(hour: u8, minute: u8) -> Option<Self> {
        if hour >= 24 || !matches!(minute, 0 | 30) {
            return None;
        }
        Self::new(hour * 2 + minute / 30)
    }

    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..TIME_SLOT_COUNT).map(TimeSlot)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn hour(self) -> u8 {
        self.0 / 2
    }

    pub fn minute(self) -> u8 {
        (self.0 % 2) * 30
    }

    pub fn label(self) -> String {
        let hour = self.hour();
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        let period = if hour < 12 { "AM" } else { "PM" };
        format!("{hour12:02}:{:02} {period}", self.minute())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TimeSlot::all()
            .find(|slot| slot.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainParseError::UnknownTimeSlot(s.to_string()))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = DomainParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(value: TimeSlot) -> Self {
        value.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_has_forty_eight_labelled_slots() {
        let labels: Vec<String> = TimeSlot::all().map(TimeSlot::label).collect();
        assert_eq!(labels.len(), 48);
        assert_eq!(labels[0], "12:00 AM");
        assert_eq!(labels[1], "12:30 AM");
        assert_eq!(labels[2], "01:00 AM");
        assert_eq!(labels[24], "12:00 PM");
        assert_eq!(labels[47], "11:30 PM");
    }

    #[test]
    fn slot_labels_parse_back() {
        assert_eq!("10:00 AM".parse::<TimeSlot>(), Ok(TimeSlot::at(10, 0).expect("slot")));
        assert_eq!("11:00 PM".parse::<TimeSlot>(), Ok(TimeSlot::at(23, 0).expect("slot")));
        assert!("10:15 AM".parse::<TimeSlot>().is_err());
        assert!(TimeSlot::at(24, 0).is_none());
    }

    #[test]
    fn time_zones_parse_case_insensitively() {
        assert_eq!("pacific".parse::<TimeZone>(), Ok(TimeZone::Pacific));
        assert!("Atlantic".parse::<TimeZone>().is_err());
    }
}
