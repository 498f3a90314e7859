use log::{error, info};

use crate::message_bus::{BusHandler, BusSender, MessageBus};
use crate::{commands::Commands, events::Events};

pub struct LoggingModule {}

impl BusHandler<()> for LoggingModule {
    async fn event_handler(_bus: &BusSender, _context: &mut (), event: Events) {
        match event {
            Events::Restored(unit) => match unit.data {
                Ok(buf) => {
                    info!("Restored {} of {} bytes", unit.kind.as_ref(), buf.len());
                }
                Err(err) => {
                    error!("Failed to restore {} error: {}", unit.kind.as_ref(), err);
                }
            },
            Events::RemindersDue(reminders) => {
                for reminder in reminders.iter() {
                    info!("due: {}", reminder);
                }
            }
            Events::EntryRejected(err) => {
                error!("entry rejected: {}", err);
            }
            _ => {
                info!("{}", event.as_ref());
            }
        }
    }

    async fn command_handler(_bus: &BusSender, _context: &mut (), command: Commands) {
        info!("{}", command.as_ref());
    }
}

impl LoggingModule {
    pub async fn start(bus: MessageBus) {
        MessageBus::handle::<(), Self>(bus, ()).await;
    }
}
