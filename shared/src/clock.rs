use log::warn;
use time::{OffsetDateTime, PrimitiveDateTime};
use tokio::time::Instant;

use crate::calendar::DateTime;

/// Source of the local wall-clock time the scheduler measures windows against.
pub trait Clock: Send + Sync {
    fn now(&self) -> PrimitiveDateTime;

    fn now_date_time(&self) -> DateTime {
        self.now().into()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> PrimitiveDateTime {
        let now = match OffsetDateTime::now_local() {
            Ok(local) => local,
            Err(err) => {
                warn!("local offset unavailable, falling back to utc: {}", err);
                OffsetDateTime::now_utc()
            }
        };

        PrimitiveDateTime::new(now.date(), now.time())
    }
}

/// Starts at a fixed wall-clock time and advances with the tokio clock, so
/// paused-time runtimes move it along with their timers.
pub struct AnchoredClock {
    anchor: PrimitiveDateTime,
    started: Instant,
}

impl AnchoredClock {
    pub fn new(anchor: PrimitiveDateTime) -> Self {
        Self {
            anchor,
            started: Instant::now(),
        }
    }
}

impl Clock for AnchoredClock {
    fn now(&self) -> PrimitiveDateTime {
        self.anchor + self.started.elapsed()
    }
}
