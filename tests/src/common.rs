use std::sync::{Arc, Mutex};

use sugarmummy_shared::{
    calendar::{CalendarEntry, DateTime, Description, Event, Reminder, Repetition},
    delivery::DeliverySink,
    error::Error,
};
use time::PrimitiveDateTime;

pub fn dt(text: &str) -> DateTime {
    text.parse().unwrap()
}

pub fn pdt(text: &str) -> PrimitiveDateTime {
    dt(text).to_primitive()
}

pub fn reminder(description: &str, at: &str, repetition: Repetition) -> Reminder {
    Reminder::new(Description::new(description).unwrap(), dt(at), repetition)
}

pub fn reminder_entry(description: &str, at: &str, repetition: Repetition) -> CalendarEntry {
    reminder(description, at, repetition).into()
}

pub fn event_entry(description: &str, at: &str) -> CalendarEntry {
    Event::new(Description::new(description).unwrap(), dt(at)).into()
}

/// Remembers every batch it receives.
#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<Reminder>>>,
}

impl RecordingSink {
    pub fn batches(&self) -> Vec<Vec<Reminder>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn delivered(&self) -> Vec<String> {
        self.batches()
            .iter()
            .flatten()
            .map(|x| x.description.to_string())
            .collect()
    }
}

impl DeliverySink for RecordingSink {
    fn deliver_due(&self, reminders: &[Reminder]) -> Result<(), Error> {
        self.batches.lock().unwrap().push(reminders.to_vec());

        Ok(())
    }
}

pub fn recording_sink() -> (Arc<RecordingSink>, Arc<dyn DeliverySink>) {
    let sink = Arc::new(RecordingSink::default());
    let as_sink: Arc<dyn DeliverySink> = sink.clone();

    (sink, as_sink)
}
