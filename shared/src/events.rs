use std::sync::Arc;

use strum_macros::AsRefStr;

use crate::calendar::{CalendarEntry, Reminder};
use crate::error::Error;
use crate::persistence::{PersistenceUnit, PersistenceUnitKind};

#[derive(Clone, Debug, AsRefStr)]
pub enum Events {
    CalendarChanged(Arc<Vec<CalendarEntry>>),
    EntryRejected(Error),
    RemindersDue(Arc<Vec<Reminder>>),
    PastReminders(Arc<Vec<Reminder>>),
    RemindersStopped,
    Restored(PersistenceUnit),
    Persisted(PersistenceUnitKind),
}
