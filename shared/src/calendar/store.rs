use log::info;

use super::entry::{CalendarEntry, Reminder};
use crate::error::Error;

/// Ordered calendar entries plus the reminders that have already fired.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calendar {
    entries: Vec<CalendarEntry>,
    past_reminders: Vec<Reminder>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(entries: Vec<CalendarEntry>, past_reminders: Vec<Reminder>) -> Self {
        Self {
            entries,
            past_reminders,
        }
    }

    pub fn entries(&self) -> &[CalendarEntry] {
        &self.entries
    }

    pub fn past_reminders(&self) -> &[Reminder] {
        &self.past_reminders
    }

    pub fn has_entry(&self, entry: &CalendarEntry) -> bool {
        self.entries.iter().any(|x| x.is_same_calendar_entry(entry))
    }

    pub fn add_entry(&mut self, entry: CalendarEntry) -> Result<(), Error> {
        if self.has_entry(&entry) {
            return Err(Error::DuplicateEntry(entry.to_string()));
        }

        self.entries.push(entry);

        Ok(())
    }

    pub fn delete_entry(&mut self, target: &CalendarEntry) -> Result<CalendarEntry, Error> {
        let position = self
            .entries
            .iter()
            .position(|x| x == target)
            .ok_or_else(|| Error::EntryNotFound(target.to_string()))?;

        Ok(self.entries.remove(position))
    }

    /// Replaces `target` in place. The edited entry must not collide with
    /// any other entry.
    pub fn set_entry(&mut self, target: &CalendarEntry, edited: CalendarEntry) -> Result<(), Error> {
        let position = self
            .entries
            .iter()
            .position(|x| x == target)
            .ok_or_else(|| Error::EntryNotFound(target.to_string()))?;

        let collides = self
            .entries
            .iter()
            .enumerate()
            .any(|(i, x)| i != position && x.is_same_calendar_entry(&edited));

        if collides {
            return Err(Error::DuplicateEntry(edited.to_string()));
        }

        self.entries[position] = edited;

        Ok(())
    }

    /// Appends reminders that are not already in the past reminder list.
    /// Returns how many were added.
    pub fn add_past_reminders(&mut self, reminders: &[Reminder]) -> usize {
        let mut added = 0;

        for reminder in reminders {
            if self.past_reminders.contains(reminder) {
                continue;
            }

            self.past_reminders.push(reminder.clone());
            added += 1;
        }

        if added > 0 {
            info!("{} past reminders added", added);
        }

        added
    }

    pub fn reminders(&self) -> impl Iterator<Item = &Reminder> {
        self.entries.iter().filter_map(|x| x.as_reminder())
    }
}
