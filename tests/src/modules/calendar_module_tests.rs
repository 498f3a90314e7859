use std::sync::Arc;

use sugarmummy_shared::{
    calendar::Repetition,
    commands::Commands,
    error::Error,
    events::Events,
    message_bus::MessageBus,
    modules::calendar_module::CalendarModule,
};

use crate::common::{event_entry, reminder, reminder_entry};
use crate::spy_module::SpyModule;

#[tokio::test]
async fn should_publish_entries_after_add() {
    let message_bus = MessageBus::new();

    let calendar_module_task = CalendarModule::start(message_bus.clone());

    let mut spy = SpyModule::new();
    let spy_task = spy.start(message_bus.clone(), Events::CalendarChanged(Arc::new(vec![])));

    let startup_sequence = async {
        message_bus.send_cmd(Commands::AddEntry(reminder_entry(
            "Insulin",
            "2020-05-31 16:00",
            Repetition::Daily,
        )));
    };

    let (calendar, _, _) = tokio::join!(calendar_module_task, spy_task, startup_sequence);

    assert_eq!(calendar.entries().len(), 1);

    let published = spy
        .get_result()
        .find_map(|x| match x {
            Events::CalendarChanged(entries) => Some(entries.clone()),
            _ => None,
        })
        .unwrap();

    assert_eq!(published.len(), 1);
    assert_eq!(published[0].description().as_str(), "Insulin");
}

#[tokio::test]
async fn should_reject_duplicate_entry() {
    let message_bus = MessageBus::new();

    let calendar_module_task = CalendarModule::start(message_bus.clone());

    let mut spy = SpyModule::new();
    let spy_task = spy.start(
        message_bus.clone(),
        Events::EntryRejected(Error::InvalidDescription),
    );

    let startup_sequence = async {
        let entry = event_entry("Checkup", "2020-06-01 10:00");

        message_bus.send_cmd(Commands::AddEntry(entry.clone()));
        message_bus.send_cmd(Commands::AddEntry(entry));
    };

    let (calendar, _, _) = tokio::join!(calendar_module_task, spy_task, startup_sequence);

    assert_eq!(calendar.entries().len(), 1);

    let rejected = spy.get_result().last().unwrap();
    assert!(matches!(rejected, Events::EntryRejected(Error::DuplicateEntry(_))));
}

#[tokio::test]
async fn should_edit_and_delete_entries() {
    let message_bus = MessageBus::new();

    let calendar_module_task = CalendarModule::start(message_bus.clone());

    let mut spy = SpyModule::new();
    let spy_task = spy.start(
        message_bus.clone(),
        Events::EntryRejected(Error::InvalidDescription),
    );

    let startup_sequence = async {
        let water = reminder_entry("Water", "2020-05-31 09:00", Repetition::Daily);
        let later_water = reminder_entry("Water", "2020-05-31 10:00", Repetition::Daily);
        let walk = event_entry("Walk", "2020-05-31 18:00");

        message_bus.send_cmd(Commands::AddEntry(water.clone()));
        message_bus.send_cmd(Commands::AddEntry(walk.clone()));
        message_bus.send_cmd(Commands::EditEntry(water, later_water));
        message_bus.send_cmd(Commands::DeleteEntry(walk.clone()));
        // gone by now
        message_bus.send_cmd(Commands::DeleteEntry(walk));
    };

    let (calendar, _, _) = tokio::join!(calendar_module_task, spy_task, startup_sequence);

    assert_eq!(
        calendar.entries(),
        &[reminder_entry("Water", "2020-05-31 10:00", Repetition::Daily)]
    );

    let changes = spy
        .get_result()
        .filter(|x| matches!(x, Events::CalendarChanged(_)))
        .count();

    assert_eq!(changes, 4);
    assert!(matches!(
        spy.get_result().last(),
        Some(Events::EntryRejected(Error::EntryNotFound(_)))
    ));
}

#[tokio::test]
async fn should_record_due_reminders_as_past() {
    let message_bus = MessageBus::new();

    let calendar_module_task = CalendarModule::start(message_bus.clone());

    let mut spy = SpyModule::new();
    let spy_task = spy.start(message_bus.clone(), Events::PastReminders(Arc::new(vec![])));

    let startup_sequence = async {
        let due = reminder("Insulin", "2020-05-31 16:00", Repetition::Once);

        message_bus.send_event(Events::RemindersDue(Arc::new(vec![due])));
    };

    let (calendar, _, _) = tokio::join!(calendar_module_task, spy_task, startup_sequence);

    assert_eq!(
        calendar.past_reminders(),
        &[reminder("Insulin", "2020-05-31 16:00", Repetition::Once)]
    );
}
