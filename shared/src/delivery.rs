use std::sync::{Arc, Mutex};

use log::info;

use crate::calendar::{Calendar, Reminder};
use crate::error::Error;
use crate::events::Events;
use crate::message_bus::BusSender;

/// Receives reminders when their timer fires.
///
/// Called from a worker thread of the scheduler's pool. A sink bound to a
/// particular thread must marshal the call there itself.
pub trait DeliverySink: Send + Sync {
    fn deliver_due(&self, reminders: &[Reminder]) -> Result<(), Error>;
}

impl<F> DeliverySink for F
where
    F: Fn(&[Reminder]) -> Result<(), Error> + Send + Sync,
{
    fn deliver_due(&self, reminders: &[Reminder]) -> Result<(), Error> {
        self(reminders)
    }
}

/// Appends fired reminders to a shared calendar's past reminder list.
pub struct PastReminderSink {
    calendar: Arc<Mutex<Calendar>>,
}

impl PastReminderSink {
    pub fn new(calendar: Arc<Mutex<Calendar>>) -> Self {
        Self { calendar }
    }
}

impl DeliverySink for PastReminderSink {
    fn deliver_due(&self, reminders: &[Reminder]) -> Result<(), Error> {
        let mut calendar = self.calendar.lock()?;
        calendar.add_past_reminders(reminders);

        Ok(())
    }
}

/// Publishes fired reminders on the message bus.
pub struct BusSink {
    bus: BusSender,
}

impl BusSink {
    pub fn new(bus: BusSender) -> Self {
        Self { bus }
    }
}

impl DeliverySink for BusSink {
    fn deliver_due(&self, reminders: &[Reminder]) -> Result<(), Error> {
        info!("{} reminders due", reminders.len());

        self.bus
            .try_send_event(Events::RemindersDue(Arc::new(reminders.to_vec())))
    }
}
