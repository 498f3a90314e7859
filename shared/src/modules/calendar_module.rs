use std::sync::Arc;

use log::{error, info, warn};

use crate::calendar::{Calendar, CalendarEntry};
use crate::error::Error;
use crate::message_bus::{BusHandler, BusSender, MessageBus};
use crate::persistence::{CalendarStateDto, PersistenceUnit, PersistenceUnitKind};
use crate::{commands::Commands, events::Events};

/// Owns the calendar: applies entry mutations, records fired reminders and
/// keeps the persisted state current.
pub struct CalendarModule {}

pub struct Context {
    calendar: Calendar,
}

impl BusHandler<Context> for CalendarModule {
    async fn event_handler(bus: &BusSender, context: &mut Context, event: Events) {
        match event {
            Events::RemindersDue(reminders) => {
                let added = context.calendar.add_past_reminders(reminders.as_slice());

                if added == 0 {
                    return;
                }

                bus.send_event(Events::PastReminders(Arc::new(
                    context.calendar.past_reminders().to_vec(),
                )));

                Self::persist_state(bus, context);
            }
            Events::Restored(unit) => {
                if !matches!(unit.kind, PersistenceUnitKind::CalendarState) {
                    return;
                }

                if unit.data.is_ok() {
                    Self::try_restore(context, unit).await;
                } else if let Err(error) = unit.data {
                    info!("no calendar state restored: {}", error);
                }

                bus.send_event(Events::PastReminders(Arc::new(
                    context.calendar.past_reminders().to_vec(),
                )));

                Self::publish_entries(bus, context);
            }
            _ => {}
        }
    }

    async fn command_handler(bus: &BusSender, context: &mut Context, command: Commands) {
        let result = match command {
            Commands::AddEntry(entry) => {
                info!("adding {}", entry);
                context.calendar.add_entry(entry)
            }
            Commands::DeleteEntry(entry) => {
                info!("deleting {}", entry);
                context.calendar.delete_entry(&entry).map(|_| ())
            }
            Commands::EditEntry(target, edited) => {
                info!("replacing {} with {}", target, edited);
                context.calendar.set_entry(&target, edited)
            }
            Commands::Schedule => {
                Self::publish_entries(bus, context);
                return;
            }
            _ => return,
        };

        Self::after_mutation(bus, context, result);
    }
}

impl CalendarModule {
    pub async fn start(bus: MessageBus) -> Calendar {
        Self::start_with(bus, Calendar::new()).await
    }

    /// Runs the module over an existing calendar and returns it once the
    /// bus shuts down.
    pub async fn start_with(bus: MessageBus, calendar: Calendar) -> Calendar {
        info!("starting...");

        let context = Context { calendar };

        let context = MessageBus::handle::<Context, Self>(bus, context).await;

        info!("done.");

        context.calendar
    }

    fn after_mutation(bus: &BusSender, context: &mut Context, result: Result<(), Error>) {
        match result {
            Ok(()) => {
                Self::publish_entries(bus, context);
                Self::persist_state(bus, context);
            }
            Err(error) => {
                warn!("{}", error);
                bus.send_event(Events::EntryRejected(error));
            }
        }
    }

    fn publish_entries(bus: &BusSender, context: &Context) {
        let entries: Vec<CalendarEntry> = context.calendar.entries().to_vec();

        bus.send_event(Events::CalendarChanged(Arc::new(entries)));
    }

    async fn try_restore(context: &mut Context, unit: PersistenceUnit) {
        let res: Result<CalendarStateDto, Error> = unit.deserialize().await;

        match res {
            Ok(state) => {
                info!(
                    "calendar restored: {} entries, {} past reminders, version {}",
                    state.entries.len(),
                    state.past_reminders.len(),
                    state.version
                );

                let mut restored: Calendar = state.into();

                for entry in context.calendar.entries() {
                    if restored.add_entry(entry.clone()).is_err() {
                        info!("{} already restored", entry);
                    }
                }

                restored.add_past_reminders(context.calendar.past_reminders());

                context.calendar = restored;
            }
            Err(error) => {
                error!("{:?}", error);
            }
        }
    }

    fn persist_state(bus: &BusSender, context: &Context) {
        let dto = CalendarStateDto::from(&context.calendar);

        match PersistenceUnit::new(PersistenceUnitKind::CalendarState, &dto) {
            Ok(unit) => bus.send_cmd(Commands::Persist(unit)),
            Err(error) => error!("{}", error),
        }
    }
}
