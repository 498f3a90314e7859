pub mod calendar;
pub mod clock;
pub mod commands;
pub mod config;
pub mod delivery;
pub mod error;
pub mod events;
pub mod message_bus;
pub mod modules;
pub mod persistence;
pub mod scheduler;
pub mod storage;

pub use calendar::{Calendar, CalendarEntry, DateTime, Description, Event, Reminder, Repetition};
pub use delivery::DeliverySink;
pub use error::Error;
pub use scheduler::{Scheduler, SchedulerState, Window};
