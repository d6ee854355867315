use crate::error::HabitError;

use chrono::{NaiveDate, NaiveTime, Timelike};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::BTreeSet, fmt, str::FromStr};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Blue,
    Red,
    Green,
    Orange,
    Purple,
}

impl Color {
    /// Accent as an RGB triple, used for truecolor terminal output.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Blue => (0x00, 0x7a, 0xff),
            Color::Red => (0xff, 0x3b, 0x30),
            Color::Green => (0x34, 0xc7, 0x59),
            Color::Orange => (0xff, 0x95, 0x00),
            Color::Purple => (0xaf, 0x52, 0xde),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

/// Time of day a reminder fires, stored as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReminderTime(NaiveTime);

impl ReminderTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn matches(&self, time: NaiveTime) -> bool {
        self.hour() == time.hour() && self.minute() == time.minute()
    }
}

impl FromStr for ReminderTime {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
            .map(Self)
            .map_err(|_| HabitError::InvalidTime(s.to_string()))
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl Serialize for ReminderTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReminderTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, HabitError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| HabitError::InvalidDate(s.to_string()))
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub color: Color,
    pub streak: u32,
    pub completed_dates: BTreeSet<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ReminderTime>,
    #[serde(default)]
    pub notifications: bool,
}

impl Habit {
    pub fn new(id: i64, name: String, color: Color) -> Self {
        Habit {
            id,
            name,
            color,
            streak: 0,
            completed_dates: BTreeSet::new(),
            time: None,
            notifications: false,
        }
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }
}

/// What a toggle did to the habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionResult {
    pub became_completed: bool,
    pub new_streak: u32,
}

/// How much of the rendered view a mutation invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Habits were added, removed, renamed or recolored
    Collection,
    /// Only this habit's card needs refreshing
    Habit(i64),
}

/// Trims a user supplied name, refusing it when nothing is left.
pub fn validate_name(name: &str) -> Result<String, HabitError> {
    match name.trim() {
        "" => Err(HabitError::EmptyName),
        trimmed => Ok(trimmed.to_string()),
    }
}
