use strum_macros::AsRefStr;

use crate::calendar::CalendarEntry;
use crate::persistence::{PersistenceUnit, PersistenceUnitKind};

#[derive(Clone, Debug, AsRefStr)]
pub enum Commands {
    AddEntry(CalendarEntry),
    DeleteEntry(CalendarEntry),
    EditEntry(CalendarEntry, CalendarEntry),
    Schedule,
    StopReminders,
    Persist(PersistenceUnit),
    Restore(PersistenceUnitKind),
    Shutdown,
}
