pub mod date_time;
pub mod entry;
pub mod store;

pub use date_time::DateTime;
pub use entry::{CalendarEntry, Description, Event, Reminder, Repetition};
pub use store::Calendar;
