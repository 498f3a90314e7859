use std::sync::Arc;

use log::{error, info, warn};
use tokio::runtime::Handle;

use crate::clock::Clock;
use crate::delivery::BusSink;
use crate::error::Error;
use crate::message_bus::{BusHandler, BusSender, MessageBus};
use crate::scheduler::Scheduler;
use crate::{commands::Commands, events::Events};

/// Keeps the scheduler in step with the calendar. Due reminders go back
/// onto the bus as [`Events::RemindersDue`].
pub struct ReminderModule {}

pub struct Context {
    scheduler: Scheduler,
}

impl BusHandler<Context> for ReminderModule {
    async fn event_handler(_bus: &BusSender, context: &mut Context, event: Events) {
        if let Events::CalendarChanged(entries) = event {
            match context.scheduler.schedule(entries.as_slice()) {
                Ok(()) => {}
                Err(Error::SchedulerStopped) => {
                    warn!("reminders are stopped, {} entries not scheduled", entries.len());
                }
                Err(error) => error!("{}", error),
            }
        }
    }

    async fn command_handler(bus: &BusSender, context: &mut Context, command: Commands) {
        match command {
            Commands::StopReminders => {
                context.scheduler.stop_all();
                bus.send_event(Events::RemindersStopped);
            }
            Commands::Shutdown => {
                context.scheduler.stop_all();
            }
            _ => {}
        }
    }
}

impl ReminderModule {
    pub async fn start(bus: MessageBus, clock: Arc<dyn Clock>) {
        info!("starting...");

        let sink = Arc::new(BusSink::new(bus.sender()));
        let scheduler = Scheduler::with_handle(Handle::current(), clock, sink);

        let context = Context { scheduler };

        MessageBus::handle::<Context, Self>(bus, context).await;

        info!("done.");
    }
}
