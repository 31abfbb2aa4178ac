//! Single-threaded event loop driving the wall.
//!
//! Three timer sources share the rotation state: the rotation timer
//! (dwell/transition), the fixed background poll and the initial-load retry.
//! They are multiplexed with `select!` on one task, so every handler runs to
//! completion before the next one observes the state. Fetches run as a
//! pending future inside the same loop and never block the timers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use signage_core::marquee::size_marquee;
use signage_core::refresh::{FetchOrigin, RefreshPolicy};
use signage_core::render::ContentFrame;
use signage_core::rotation::{Command, RotationScheduler, Signal, Snapshot, Timings};
use signage_core::{active_screens, Dataset, MonthDay};
use tokio::sync::watch;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::client::{DatasetSource, FetchError};
use crate::presenter::Presenter;

type PendingFetch =
    Pin<Box<dyn Future<Output = (FetchOrigin, Result<Dataset, FetchError>)> + Send>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub timings: Timings,
    pub refresh: RefreshPolicy,
}

pub struct Engine<S, P> {
    source: Arc<S>,
    presenter: P,
    scheduler: RotationScheduler,
    refresh: RefreshPolicy,
    calendar: fn() -> MonthDay,
    pending_fetch: Option<PendingFetch>,
    rotation_timer: Option<(Instant, Signal)>,
    retry_at: Option<Instant>,
}

impl<S: DatasetSource, P: Presenter> Engine<S, P> {
    pub fn new(source: S, presenter: P, config: EngineConfig) -> Self {
        Self {
            source: Arc::new(source),
            presenter,
            scheduler: RotationScheduler::new(config.timings),
            refresh: config.refresh,
            calendar: MonthDay::today,
            pending_fetch: None,
            rotation_timer: None,
            retry_at: None,
        }
    }

    /// Overrides the source of "today" used for birthday eligibility.
    pub fn with_calendar(mut self, calendar: fn() -> MonthDay) -> Self {
        self.calendar = calendar;
        self
    }

    /// Runs until `shutdown` flips to true or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let poll_every = self.refresh.poll_interval;
        let mut poll = interval_at(Instant::now() + poll_every, poll_every);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.start_fetch(FetchOrigin::Initial);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("shutting down");
                        break;
                    }
                }
                (origin, result) = pending(&mut self.pending_fetch) => {
                    self.pending_fetch = None;
                    self.on_fetched(origin, result);
                }
                _ = sleep_until_some(self.rotation_timer.map(|(at, _)| at)) => {
                    if let Some((_, signal)) = self.rotation_timer.take() {
                        let commands = self.scheduler.handle(signal);
                        self.execute(commands);
                    }
                }
                _ = sleep_until_some(self.retry_at) => {
                    self.retry_at = None;
                    self.start_fetch(FetchOrigin::Initial);
                }
                _ = poll.tick() => {
                    if self.scheduler.is_idle() {
                        debug!("poll skipped; initial load pending");
                    } else {
                        self.start_fetch(FetchOrigin::Background);
                    }
                }
            }
        }
    }

    fn start_fetch(&mut self, origin: FetchOrigin) {
        if self.pending_fetch.is_some() {
            debug!(?origin, "fetch already in flight");
            return;
        }
        let source = Arc::clone(&self.source);
        self.pending_fetch = Some(Box::pin(async move { (origin, source.fetch().await) }));
    }

    fn on_fetched(&mut self, origin: FetchOrigin, result: Result<Dataset, FetchError>) {
        match result {
            Ok(dataset) => self.install(dataset),
            Err(e) => match self.refresh.retry_after(origin) {
                Some(delay) => {
                    warn!(error = %e, retry_ms = delay.as_millis() as u64, "initial load failed; retrying");
                    self.retry_at.get_or_insert_with(|| Instant::now() + delay);
                }
                None => warn!(error = %e, "background refresh failed; keeping last snapshot"),
            },
        }
    }

    /// Replaces the snapshot and everything derived from it in one step.
    fn install(&mut self, dataset: Dataset) {
        let today = (self.calendar)();
        let frame = ContentFrame::build(&dataset, today);
        self.presenter.render(&frame);

        let marquee = size_marquee(&self.presenter.measure_notices());
        self.presenter.set_marquee(marquee.as_ref());

        let snapshot = Snapshot {
            active: active_screens(&dataset, today),
            marquee: marquee.map(|m| m.total_duration()),
        };

        let commands = self.scheduler.apply(snapshot);
        self.execute(commands);
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Reveal { screen } => self.presenter.reveal(screen),
                Command::Transition { from, to, timings } => {
                    self.presenter.transition(from, to, &timings)
                }
                Command::Schedule { after, signal } => {
                    debug!(?signal, after_ms = after.as_millis() as u64, "timer armed");
                    self.rotation_timer = Some((Instant::now() + after, signal));
                }
                Command::Refresh => self.start_fetch(FetchOrigin::Background),
            }
        }
    }
}

async fn pending<F: Future + Unpin>(fut: &mut Option<F>) -> F::Output {
    match fut {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
