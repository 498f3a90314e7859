use std::sync::Arc;

use sugarmummy_shared::{
    calendar::{Calendar, Repetition},
    error::Error,
    persistence::{
        CalendarStateDto, PersistenceUnit, PersistenceUnitDto, PersistenceUnitKind,
        CALENDAR_STATE_VERSION,
    },
    storage::FileStorage,
};

use crate::common::{event_entry, reminder, reminder_entry};

fn calendar() -> Calendar {
    Calendar::from_parts(
        vec![
            reminder_entry("Insulin", "2020-05-31 16:00", Repetition::Daily),
            event_entry("Checkup", "2020-06-01 10:00"),
        ],
        vec![reminder("Water", "2020-05-30 09:00", Repetition::Once)],
    )
}

#[tokio::test]
async fn calendar_state_survives_a_persistence_unit() {
    let dto = CalendarStateDto::from(&calendar());
    assert_eq!(dto.version, CALENDAR_STATE_VERSION);

    let unit = PersistenceUnit::new(PersistenceUnitKind::CalendarState, &dto).unwrap();
    let decoded: CalendarStateDto = unit.deserialize().await.unwrap();

    assert_eq!(Calendar::from(decoded), calendar());
}

#[tokio::test]
async fn garbage_does_not_deserialize() {
    let unit = PersistenceUnit {
        kind: PersistenceUnitKind::CalendarState,
        data: Ok(Arc::new(vec![0xc1, 0x00, 0x13])),
    };

    let result: Result<CalendarStateDto, Error> = unit.deserialize().await;

    assert!(matches!(result, Err(Error::Persistence(_))));
}

#[test]
fn failed_unit_has_no_dto() {
    let unit = PersistenceUnit {
        kind: PersistenceUnitKind::CalendarState,
        data: Err(Error::Io("missing".to_string())),
    };

    let result = PersistenceUnitDto::try_from(unit);

    assert_eq!(result.unwrap_err(), Error::Io("missing".to_string()));
}

#[tokio::test]
async fn file_storage_reads_back_what_it_wrote() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::create(&dir.path().join("state")).await.unwrap();

    assert!(matches!(
        storage.read_bytes("CalendarState").await,
        Err(Error::Io(_))
    ));

    storage.write_bytes("CalendarState", &[1, 2, 3]).await.unwrap();
    storage.write_bytes("CalendarState", &[4, 5]).await.unwrap();

    assert_eq!(storage.read_bytes("CalendarState").await.unwrap(), vec![4, 5]);
}
