use sugarmummy_shared::{
    calendar::{Calendar, Repetition},
    error::Error,
};

use crate::common::{event_entry, reminder, reminder_entry};

#[test]
fn should_add_and_reject_weak_duplicates() {
    let mut calendar = Calendar::new();

    calendar
        .add_entry(reminder_entry("Insulin", "2020-05-31 16:00", Repetition::Once))
        .unwrap();

    let duplicate = reminder_entry("Insulin", "2020-05-31 16:00", Repetition::Daily);

    assert!(calendar.has_entry(&duplicate));
    assert!(matches!(
        calendar.add_entry(duplicate),
        Err(Error::DuplicateEntry(_))
    ));
    assert_eq!(calendar.entries().len(), 1);
}

#[test]
fn event_and_reminder_with_same_anchor_coexist() {
    let mut calendar = Calendar::new();

    calendar
        .add_entry(reminder_entry("Checkup", "2020-06-03 10:00", Repetition::Once))
        .unwrap();
    calendar
        .add_entry(event_entry("Checkup", "2020-06-03 10:00"))
        .unwrap();

    assert_eq!(calendar.entries().len(), 2);
    assert_eq!(calendar.reminders().count(), 1);
}

#[test]
fn should_delete_and_report_missing_entries() {
    let mut calendar = Calendar::new();
    let water = reminder_entry("Water", "2020-05-31 09:00", Repetition::Daily);

    calendar.add_entry(water.clone()).unwrap();

    assert_eq!(calendar.delete_entry(&water), Ok(water.clone()));
    assert!(matches!(
        calendar.delete_entry(&water),
        Err(Error::EntryNotFound(_))
    ));
}

#[test]
fn should_edit_in_place_unless_it_collides() {
    let mut calendar = Calendar::new();
    let water = reminder_entry("Water", "2020-05-31 09:00", Repetition::Daily);
    let gym = reminder_entry("Gym", "2020-06-01 07:00", Repetition::Weekly);

    calendar.add_entry(water.clone()).unwrap();
    calendar.add_entry(gym.clone()).unwrap();

    let later_water = reminder_entry("Water", "2020-05-31 10:00", Repetition::Daily);
    calendar.set_entry(&water, later_water.clone()).unwrap();

    assert_eq!(calendar.entries()[0], later_water);

    let gym_at_water_time = reminder_entry("Water", "2020-05-31 10:00", Repetition::Once);
    assert!(matches!(
        calendar.set_entry(&gym, gym_at_water_time),
        Err(Error::DuplicateEntry(_))
    ));

    // an edit that keeps its own identity is fine
    let weekly_water = reminder_entry("Water", "2020-05-31 10:00", Repetition::Weekly);
    calendar.set_entry(&later_water, weekly_water).unwrap();
}

#[test]
fn past_reminders_are_not_duplicated() {
    let mut calendar = Calendar::new();
    let insulin = reminder("Insulin", "2020-05-31 16:00", Repetition::Once);
    let water = reminder("Water", "2020-05-31 16:00", Repetition::Daily);

    assert_eq!(
        calendar.add_past_reminders(&[insulin.clone(), water.clone()]),
        2
    );
    assert_eq!(calendar.add_past_reminders(&[insulin.clone()]), 0);
    assert_eq!(calendar.past_reminders(), &[insulin, water]);
}
