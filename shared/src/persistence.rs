use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;
use tokio::task::JoinError;

use crate::calendar::{Calendar, CalendarEntry, Reminder};
use crate::error::Error;

pub const CALENDAR_STATE_VERSION: i32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, AsRefStr, Hash, Copy, PartialEq, Eq)]
pub enum PersistenceUnitKind {
    CalendarState,
}

#[derive(Debug, Clone)]
pub struct PersistenceUnit {
    pub kind: PersistenceUnitKind,
    pub data: Result<Arc<Vec<u8>>, Error>,
}

#[derive(Debug, Serialize, Deserialize, Hash)]
pub struct PersistenceUnitDto {
    pub kind: PersistenceUnitKind,
    pub data: Vec<u8>,
}

impl PersistenceUnit {
    pub fn new<TObj>(kind: PersistenceUnitKind, obj: &TObj) -> Result<PersistenceUnit, Error>
    where
        TObj: Serialize,
    {
        let buf = rmp_serde::to_vec(obj)?;

        Ok(PersistenceUnit {
            kind,
            data: Ok(Arc::new(buf)),
        })
    }

    pub async fn deserialize<T>(self) -> Result<T, Error>
    where
        for<'a> T: Deserialize<'a> + Send + 'static,
    {
        let data_arc = self.data?;

        let result: Result<Result<T, rmp_serde::decode::Error>, JoinError> =
            tokio::task::spawn_blocking(move || rmp_serde::from_slice::<T>(data_arc.as_slice()))
                .await;

        match result {
            Ok(deserialize_res) => deserialize_res.map_err(Error::from),
            Err(err) => Err(Error::Persistence(err.to_string())),
        }
    }
}

impl TryFrom<PersistenceUnit> for PersistenceUnitDto {
    type Error = Error;

    fn try_from(unit: PersistenceUnit) -> Result<Self, Self::Error> {
        let data = unit.data?;

        Ok(PersistenceUnitDto {
            kind: unit.kind,
            data: data.to_vec(),
        })
    }
}

/// Persisted form of a [`Calendar`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalendarStateDto {
    pub version: i32,
    pub entries: Vec<CalendarEntry>,
    pub past_reminders: Vec<Reminder>,
}

impl From<&Calendar> for CalendarStateDto {
    fn from(calendar: &Calendar) -> Self {
        Self {
            version: CALENDAR_STATE_VERSION,
            entries: calendar.entries().to_vec(),
            past_reminders: calendar.past_reminders().to_vec(),
        }
    }
}

impl From<CalendarStateDto> for Calendar {
    fn from(dto: CalendarStateDto) -> Self {
        Calendar::from_parts(dto.entries, dto.past_reminders)
    }
}
