use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum_macros::AsRefStr;
use time::{Date, Time, Weekday};

use super::date_time::{ensure_same_date, DateTime};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Description(String);

impl Description {
    pub fn new(text: impl Into<String>) -> Result<Self, Error> {
        let text = text.into();

        if text.trim().is_empty() {
            return Err(Error::InvalidDescription);
        }

        Ok(Self(text.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize_repr, Deserialize_repr, PartialEq, Eq, Clone, Copy, Hash, AsRefStr)]
#[repr(u8)]
pub enum Repetition {
    Once = 0,
    Daily = 1,
    Weekly = 2,
}

impl FromStr for Repetition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(Repetition::Once),
            "daily" => Ok(Repetition::Daily),
            "weekly" => Ok(Repetition::Weekly),
            other => Err(Error::Parse(format!("unknown repetition '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reminder {
    pub description: Description,
    pub date_time: DateTime,
    pub repetition: Repetition,
}

impl Reminder {
    pub fn new(description: Description, date_time: DateTime, repetition: Repetition) -> Self {
        Self {
            description,
            date_time,
            repetition,
        }
    }

    pub fn date(&self) -> Date {
        self.date_time.date()
    }

    pub fn time(&self) -> Time {
        self.date_time.time()
    }

    pub fn day_of_week(&self) -> Weekday {
        self.date_time.day_of_week()
    }

    /// Same description and date-time; repetition is ignored.
    pub fn is_same_reminder(&self, other: &Reminder) -> bool {
        self.description == other.description && self.date_time == other.date_time
    }

    /// Returns true if the next occurrence of this reminder falls into
    /// `[start, end]`. Both ends must be on the same date.
    pub fn is_between(&self, start: &DateTime, end: &DateTime) -> Result<bool, Error> {
        ensure_same_date(start, end)?;

        let anchor = &self.date_time;

        let due = match self.repetition {
            Repetition::Once => anchor.is_between_date_time(start, end),
            Repetition::Daily => {
                !anchor.is_after_date_time(end) && anchor.is_between_time(start, end)
            }
            Repetition::Weekly => {
                !anchor.is_after_date_time(end)
                    && anchor.day_of_week() == end.day_of_week()
                    && anchor.is_between_time(start, end)
            }
        };

        Ok(due)
    }
}

impl Display for Reminder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reminder Description: {}", self.description)?;

        let hh_mm = format!("{:02}:{:02}", self.time().hour(), self.time().minute());

        match self.repetition {
            Repetition::Once => write!(f, " on: {}", self.date_time),
            Repetition::Daily => write!(f, " at: {} everyday from: {}", hh_mm, self.date()),
            Repetition::Weekly => write!(f, " at: {} every {}", hh_mm, self.day_of_week()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub description: Description,
    pub date_time: DateTime,
    pub ending_date_time: Option<DateTime>,
    pub auto_reminder: Option<Reminder>,
}

impl Event {
    pub fn new(description: Description, date_time: DateTime) -> Self {
        Self {
            description,
            date_time,
            ending_date_time: None,
            auto_reminder: None,
        }
    }

    pub fn with_ending(mut self, ending_date_time: DateTime) -> Self {
        self.ending_date_time = Some(ending_date_time);
        self
    }

    pub fn with_auto_reminder(mut self, reminder: Reminder) -> Self {
        self.auto_reminder = Some(reminder);
        self
    }

    pub fn is_same_event(&self, other: &Event) -> bool {
        self.description == other.description && self.date_time == other.date_time
    }

    pub fn is_between(&self, start: &DateTime, end: &DateTime) -> bool {
        self.date_time.is_between_date_time(start, end)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Event Description: {} From: {}",
            self.description, self.date_time
        )?;

        if let Some(ending) = &self.ending_date_time {
            write!(f, " To: {}", ending)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
pub enum CalendarEntry {
    Event(Event),
    Reminder(Reminder),
}

impl CalendarEntry {
    pub fn description(&self) -> &Description {
        match self {
            CalendarEntry::Event(event) => &event.description,
            CalendarEntry::Reminder(reminder) => &reminder.description,
        }
    }

    pub fn date_time(&self) -> &DateTime {
        match self {
            CalendarEntry::Event(event) => &event.date_time,
            CalendarEntry::Reminder(reminder) => &reminder.date_time,
        }
    }

    pub fn as_reminder(&self) -> Option<&Reminder> {
        match self {
            CalendarEntry::Reminder(reminder) => Some(reminder),
            _ => None,
        }
    }

    /// Weak identity used for duplicate detection.
    pub fn is_same_calendar_entry(&self, other: &CalendarEntry) -> bool {
        match (self, other) {
            (CalendarEntry::Event(a), CalendarEntry::Event(b)) => a.is_same_event(b),
            (CalendarEntry::Reminder(a), CalendarEntry::Reminder(b)) => a.is_same_reminder(b),
            _ => false,
        }
    }
}

impl From<Reminder> for CalendarEntry {
    fn from(value: Reminder) -> Self {
        CalendarEntry::Reminder(value)
    }
}

impl From<Event> for CalendarEntry {
    fn from(value: Event) -> Self {
        CalendarEntry::Event(value)
    }
}

impl Display for CalendarEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarEntry::Event(event) => event.fmt(f),
            CalendarEntry::Reminder(reminder) => reminder.fmt(f),
        }
    }
}
