//! Reminder scheduling.
//!
//! Every pass looks at the rest of the current day (the window), arms one
//! timer per distinct due time and one rollover timer that fires a minute
//! after the window closes, moves the window to the next day and runs the
//! next pass. A new pass always cancels the timers of the previous one.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::{debug, error, info, warn};
use time::macros::time;
use time::Time;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::AbortHandle;

use crate::calendar::{CalendarEntry, DateTime, Reminder};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::delivery::DeliverySink;
use crate::error::Error;

/// Last minute of a scheduling day.
pub const WINDOW_END: Time = time!(23:59);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime,
    pub end: DateTime,
}

impl Window {
    /// The rest of the day `now` falls on.
    pub fn starting_at(now: DateTime) -> Self {
        let start = now.truncated_to_minute();

        Self {
            start,
            end: start.with_time(WINDOW_END),
        }
    }

    /// Moves the start to `now` while keeping both ends on one date.
    fn align(&mut self, now: DateTime) {
        let start = now.truncated_to_minute();

        if start.date() > self.end.date() {
            warn!(
                "window end {} is behind {}, skipping to the current day",
                self.end, start
            );
            self.end = start.with_time(WINDOW_END);
            self.start = start;
        } else if start.date() < self.end.date() {
            self.start = DateTime::new(self.end.date(), Time::MIDNIGHT);
        } else {
            self.start = start;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Armed,
    Stopped,
}

/// One timer's worth of reminders.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDelivery {
    pub time: Time,
    pub delay: std::time::Duration,
    pub reminders: Vec<Reminder>,
}

/// Time left from `now` until `target`, floored at zero.
pub fn delay_until(target: DateTime, now: DateTime) -> std::time::Duration {
    let diff = target.to_primitive() - now.to_primitive();

    std::time::Duration::try_from(diff).unwrap_or(std::time::Duration::ZERO)
}

/// Groups the reminders due in `window` by time of day, in time order.
pub fn plan(
    entries: &[CalendarEntry],
    window: &Window,
    now: DateTime,
) -> Result<Vec<PlannedDelivery>, Error> {
    let mut groups: BTreeMap<Time, Vec<Reminder>> = BTreeMap::new();

    for reminder in entries.iter().filter_map(CalendarEntry::as_reminder) {
        if reminder.is_between(&window.start, &window.end)? {
            groups
                .entry(reminder.time())
                .or_default()
                .push(reminder.clone());
        }
    }

    let planned = groups
        .into_iter()
        .map(|(time, reminders)| PlannedDelivery {
            time,
            delay: delay_until(window.start.with_time(time), now),
            reminders,
        })
        .collect();

    Ok(planned)
}

struct State {
    status: SchedulerState,
    window: Window,
    entries: Arc<Vec<CalendarEntry>>,
    deliveries: Vec<AbortHandle>,
    rollover: Option<AbortHandle>,
    generation: u64,
    passes: u64,
}

impl State {
    fn cancel_all(&mut self) {
        for handle in self.deliveries.drain(..) {
            handle.abort();
        }

        if let Some(handle) = self.rollover.take() {
            handle.abort();
        }
    }
}

struct Inner {
    clock: Arc<dyn Clock>,
    sink: Arc<dyn DeliverySink>,
    handle: Handle,
    state: Mutex<State>,
}

impl Inner {
    fn lock_state(&self) -> Result<MutexGuard<'_, State>, Error> {
        Ok(self.state.lock()?)
    }

    fn schedule(self: &Arc<Self>, entries: Arc<Vec<CalendarEntry>>) -> Result<(), Error> {
        let mut state = self.lock_state()?;

        if state.status == SchedulerState::Stopped {
            return Err(Error::SchedulerStopped);
        }

        state.entries = entries;

        self.arm(&mut state)
    }

    fn rollover(self: &Arc<Self>, generation: u64) -> Result<(), Error> {
        let mut state = self.lock_state()?;

        if state.status == SchedulerState::Stopped || state.generation != generation {
            debug!("stale rollover {} ignored", generation);
            return Ok(());
        }

        state.window.end = state.window.end.plus_days(1);

        info!("rollover, window now ends {}", state.window.end);

        self.arm(&mut state)
    }

    fn arm(self: &Arc<Self>, state: &mut State) -> Result<(), Error> {
        state.cancel_all();

        let now = self.clock.now_date_time();
        state.window.align(now);

        let planned = plan(&state.entries, &state.window, now)?;

        state.generation += 1;
        state.passes += 1;

        for delivery in planned {
            debug!(
                "arming {} reminders at {} in {:?}",
                delivery.reminders.len(),
                delivery.time,
                delivery.delay
            );

            let handle = self.arm_delivery(delivery);
            state.deliveries.push(handle);
        }

        let rollover_delay = delay_until(state.window.end.plus_minutes(1), now);
        state.rollover = Some(self.arm_rollover(rollover_delay, state.generation));
        state.status = SchedulerState::Armed;

        info!(
            "pass {}: {} deliveries armed until {}, rollover in {:?}",
            state.passes,
            state.deliveries.len(),
            state.window.end,
            rollover_delay
        );

        Ok(())
    }

    fn arm_delivery(&self, delivery: PlannedDelivery) -> AbortHandle {
        let sink = self.sink.clone();

        self.handle
            .spawn(async move {
                tokio::time::sleep(delivery.delay).await;

                deliver(sink.as_ref(), &delivery.reminders);
            })
            .abort_handle()
    }

    fn arm_rollover(self: &Arc<Self>, delay: std::time::Duration, generation: u64) -> AbortHandle {
        let inner: Weak<Inner> = Arc::downgrade(self);

        self.handle
            .spawn(async move {
                tokio::time::sleep(delay).await;

                let Some(inner) = inner.upgrade() else {
                    return;
                };

                if let Err(err) = inner.rollover(generation) {
                    error!("rollover failed: {}", err);
                }
            })
            .abort_handle()
    }
}

fn deliver(sink: &dyn DeliverySink, reminders: &[Reminder]) {
    let result = catch_unwind(AssertUnwindSafe(|| sink.deliver_due(reminders)));

    match result {
        Ok(Ok(())) => {
            debug!("delivered {} reminders", reminders.len());
        }
        Ok(Err(err)) => {
            error!("delivery of {} reminders failed: {}", reminders.len(), err);
        }
        Err(_) => {
            error!("delivery of {} reminders panicked", reminders.len());
        }
    }
}

/// Arms timers for due reminders and keeps doing so day after day.
pub struct Scheduler {
    inner: Arc<Inner>,
    runtime: Mutex<Option<Runtime>>,
}

impl Scheduler {
    /// A scheduler with its own worker pool of `config.worker_threads`
    /// threads, reading the system clock.
    ///
    /// Meant for synchronous callers. Inside an async context use
    /// [`Scheduler::with_handle`].
    pub fn new(config: &Config, sink: Arc<dyn DeliverySink>) -> Result<Self, Error> {
        let runtime = Builder::new_multi_thread()
            .enable_time()
            .worker_threads(config.worker_threads)
            .thread_name("reminder-timer")
            .build()?;

        let handle = runtime.handle().clone();
        let scheduler = Self::build(handle, Arc::new(SystemClock), sink, Some(runtime));

        Ok(scheduler)
    }

    /// A scheduler arming its timers on an existing runtime.
    pub fn with_handle(handle: Handle, clock: Arc<dyn Clock>, sink: Arc<dyn DeliverySink>) -> Self {
        Self::build(handle, clock, sink, None)
    }

    fn build(
        handle: Handle,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn DeliverySink>,
        runtime: Option<Runtime>,
    ) -> Self {
        let window = Window::starting_at(clock.now_date_time());

        let state = State {
            status: SchedulerState::Idle,
            window,
            entries: Arc::new(vec![]),
            deliveries: vec![],
            rollover: None,
            generation: 0,
            passes: 0,
        };

        Self {
            inner: Arc::new(Inner {
                clock,
                sink,
                handle,
                state: Mutex::new(state),
            }),
            runtime: Mutex::new(runtime),
        }
    }

    /// Cancels the previous pass and arms timers for everything in
    /// `entries` still due today, plus the rollover into tomorrow.
    ///
    /// Returns immediately. `entries` is copied; later changes need
    /// another call.
    pub fn schedule(&self, entries: &[CalendarEntry]) -> Result<(), Error> {
        self.inner.schedule(Arc::new(entries.to_vec()))
    }

    /// Cancels every timer, the rollover included, and releases an owned
    /// worker pool. Any later [`Scheduler::schedule`] fails.
    pub fn stop_all(&self) {
        let mut state = match self.inner.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        if state.status != SchedulerState::Stopped {
            info!("stopping, {} deliveries cancelled", state.deliveries.len());
        }

        state.cancel_all();
        state.status = SchedulerState::Stopped;
        drop(state);

        let runtime = match self.runtime.lock() {
            Ok(mut runtime) => runtime.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(runtime) = runtime {
            runtime.shutdown_background();
        }
    }

    pub fn state(&self) -> Result<SchedulerState, Error> {
        Ok(self.inner.lock_state()?.status)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state(), Ok(SchedulerState::Stopped))
    }

    pub fn window(&self) -> Result<Window, Error> {
        Ok(self.inner.lock_state()?.window)
    }

    /// Delivery timers of the current pass that have not fired yet.
    pub fn armed_deliveries(&self) -> Result<usize, Error> {
        let state = self.inner.lock_state()?;

        Ok(state.deliveries.iter().filter(|x| !x.is_finished()).count())
    }

    /// Number of scheduling passes run so far, rollovers included.
    pub fn passes(&self) -> Result<u64, Error> {
        Ok(self.inner.lock_state()?.passes)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}
