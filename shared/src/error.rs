use std::sync::PoisonError;

use thiserror::Error;
use time::Date;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("window start {start} and window end {end} must be on the same date")]
    InvalidWindow { start: Date, end: Date },

    #[error("scheduler has been stopped")]
    SchedulerStopped,

    #[error("calendar entry already exists: {0}")]
    DuplicateEntry(String),

    #[error("calendar entry not found: {0}")]
    EntryNotFound(String),

    #[error("description should not be blank")]
    InvalidDescription,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("delivery error: {0}")]
    Delivery(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("concurrency error: a lock has been poisoned")]
    Poisoned,
}

impl<G> From<PoisonError<G>> for Error {
    fn from(_: PoisonError<G>) -> Self {
        Self::Poisoned
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error.to_string())
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(error: rmp_serde::encode::Error) -> Self {
        Error::Persistence(error.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(error: rmp_serde::decode::Error) -> Self {
        Error::Persistence(error.to_string())
    }
}

impl From<time::error::Parse> for Error {
    fn from(error: time::error::Parse) -> Self {
        Error::Parse(error.to_string())
    }
}
