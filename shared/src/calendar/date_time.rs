use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, PrimitiveDateTime, Time, Weekday};

use crate::error::Error;

const DISPLAY_FORMAT: &[FormatItem<'static>] =
    format_description!("[year] [month repr:short] [day] [hour]:[minute]");

const INPUT_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// A calendar date paired with a time of day.
///
/// Ordering and equality are on the combined instant. The weaker
/// time-of-day comparisons ignore the date and are what daily and weekly
/// reminders match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateTime {
    date: Date,
    time: Time,
}

impl DateTime {
    pub fn new(date: Date, time: Time) -> Self {
        Self { date, time }
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn time(&self) -> Time {
        self.time
    }

    pub fn day_of_week(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn is_same_time(&self, other: &DateTime) -> bool {
        self.time == other.time
    }

    pub fn is_before_date_time(&self, other: &DateTime) -> bool {
        self < other
    }

    pub fn is_after_date_time(&self, other: &DateTime) -> bool {
        self > other
    }

    /// Inclusive on both ends.
    pub fn is_between_date_time(&self, start: &DateTime, end: &DateTime) -> bool {
        start <= self && self <= end
    }

    /// Inclusive on both ends, dates ignored.
    pub fn is_between_time(&self, start: &DateTime, end: &DateTime) -> bool {
        start.time <= self.time && self.time <= end.time
    }

    pub fn truncated_to_minute(&self) -> DateTime {
        let minutes = i64::from(self.time.hour()) * 60 + i64::from(self.time.minute());

        DateTime {
            date: self.date,
            time: Time::MIDNIGHT + Duration::minutes(minutes),
        }
    }

    pub fn plus_minutes(&self, minutes: i64) -> DateTime {
        (self.to_primitive() + Duration::minutes(minutes)).into()
    }

    pub fn plus_days(&self, days: i64) -> DateTime {
        DateTime {
            date: self.date + Duration::days(days),
            time: self.time,
        }
    }

    /// Same date, another time of day.
    pub fn with_time(&self, time: Time) -> DateTime {
        DateTime {
            date: self.date,
            time,
        }
    }

    pub fn to_primitive(&self) -> PrimitiveDateTime {
        PrimitiveDateTime::new(self.date, self.time)
    }
}

/// Fails unless both ends of a window fall on the same calendar date.
pub fn ensure_same_date(start: &DateTime, end: &DateTime) -> Result<(), Error> {
    if start.date != end.date {
        return Err(Error::InvalidWindow {
            start: start.date,
            end: end.date,
        });
    }

    Ok(())
}

impl From<PrimitiveDateTime> for DateTime {
    fn from(value: PrimitiveDateTime) -> Self {
        DateTime {
            date: value.date(),
            time: value.time(),
        }
    }
}

impl From<DateTime> for PrimitiveDateTime {
    fn from(value: DateTime) -> Self {
        value.to_primitive()
    }
}

impl FromStr for DateTime {
    type Err = Error;

    /// Parses `yyyy-mm-dd HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = PrimitiveDateTime::parse(s.trim(), INPUT_FORMAT)?;

        Ok(parsed.into())
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self
            .to_primitive()
            .format(DISPLAY_FORMAT)
            .map_err(|_| std::fmt::Error)?;

        write!(f, "{}", formatted)
    }
}
