use std::{sync::Arc, time::Duration};

use log::{info, warn};
use parking_lot::Mutex;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use super::{EpochReport, RunOutcome, StopReason};
use crate::{
    dataset::Mode,
    error::{PerceptronErr, Result},
    session::{Session, Snapshot, Status},
};

/// Drives a shared `Session` over time.
///
/// A run is a tokio task that steps one epoch per tick until the epoch limit is reached,
/// an epoch converges or it's stopped. Each epoch runs entirely under the session lock,
/// so cancellation only ever lands between epochs. At most one run is active at a time.
///
/// Every change to the session made through the driver is published as a `Snapshot`,
/// edits made straight through `session()` are not.
pub struct Driver {
    session: Arc<Mutex<Session>>,
    snapshots: watch::Sender<Snapshot>,
    /// Parent of every run's token, cancelled for good on shutdown.
    shutdown: CancellationToken,
    token: CancellationToken,
    handle: Option<JoinHandle<RunOutcome>>,
}

impl Driver {
    /// Creates a new `Driver` for the session.
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        let (snapshots, _) = watch::channel(session.lock().snapshot());
        let shutdown = CancellationToken::new();

        Self {
            session,
            snapshots,
            token: shutdown.child_token(),
            shutdown,
            handle: None,
        }
    }

    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    /// Returns a receiver for the snapshots published after every change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Returns a token that, once cancelled, stops the current run and every later one.
    pub fn cancellation(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Whether a run is currently active.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Starts a new run, must be called from within a tokio runtime.
    ///
    /// # Args
    /// * `epoch_limit` - The epoch counter value at which the run stops.
    /// * `interval` - The time between two epochs.
    ///
    /// # Returns
    /// `false` if a run was already active, in which case nothing changes.
    ///
    /// # Errors
    /// Returns `PerceptronErr` if the epoch limit or the interval are zero.
    pub fn run(&mut self, epoch_limit: usize, interval: Duration) -> Result<bool> {
        if self.is_running() {
            return Ok(false);
        }

        if interval.is_zero() {
            return Err(PerceptronErr::InvalidInterval);
        }

        {
            let mut session = self.session.lock();
            session.trainer_mut().set_epoch_limit(epoch_limit)?;
            session.set_status(Status::Running);
            self.snapshots.send_replace(session.snapshot());
        }

        info!("run started: epoch_limit={epoch_limit} interval={interval:?}");

        self.token = self.shutdown.child_token();
        let task = run_loop(
            self.session.clone(),
            self.snapshots.clone(),
            self.token.clone(),
            interval,
        );

        self.handle = Some(tokio::spawn(task));
        Ok(true)
    }

    /// Waits for the current run to end.
    ///
    /// # Returns
    /// The run's outcome, or `None` if there was no run to wait for.
    pub async fn join(&mut self) -> Option<RunOutcome> {
        let handle = self.handle.take()?;

        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!("run task failed: {e}");
                None
            }
        }
    }

    /// Stops the current run after the epoch in progress, if any, and waits for it.
    ///
    /// Safe to call when nothing is running.
    pub async fn stop(&mut self) -> Option<RunOutcome> {
        self.token.cancel();
        self.join().await
    }

    /// Mutates the session and publishes the result under the same lock.
    ///
    /// This is the entry point for dataset edits, weight initialization and config changes.
    ///
    /// # Arguments
    /// * `f` - The mutation to apply.
    ///
    /// # Returns
    /// Whatever `f` returns.
    pub fn update<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Session) -> T,
    {
        let mut session = self.session.lock();
        let out = f(&mut session);
        self.snapshots.send_replace(session.snapshot());
        out
    }

    /// Trains a single epoch outside of a run.
    pub fn step_once(&self) -> EpochReport {
        self.update(Session::step_once)
    }

    /// Stops any run and zeroes the model and the epoch counter.
    pub async fn reset_model(&mut self) {
        self.stop().await;
        self.update(Session::reset_model);
    }

    /// Stops any run and switches the session to `mode`.
    pub async fn set_mode(&mut self, mode: Mode) {
        self.stop().await;
        self.update(|session| session.set_mode(mode));
        info!("mode: {mode}");
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_loop(
    session: Arc<Mutex<Session>>,
    snapshots: watch::Sender<Snapshot>,
    token: CancellationToken,
    interval: Duration,
) -> RunOutcome {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut history = Vec::new();
    let exhausted = session.lock().trainer().exhausted();

    let reason = if exhausted {
        StopReason::EpochLimit
    } else {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break StopReason::Stopped,
                _ = ticker.tick() => {}
            }

            if let Some(reason) = tick(&session, &snapshots, &mut history) {
                break reason;
            }
        }
    };

    let epoch = {
        let mut session = session.lock();
        let epoch = session.trainer().epoch();
        session.set_status(Status::finished(reason, epoch));
        snapshots.send_replace(session.snapshot());
        epoch
    };

    info!(
        "run finished: reason={reason:?} epoch={epoch} epochs_run={}",
        history.len()
    );

    RunOutcome {
        reason,
        epoch,
        history,
    }
}

/// Steps a single epoch under the lock.
///
/// # Returns
/// The reason to stop the run, if any.
fn tick(
    session: &Mutex<Session>,
    snapshots: &watch::Sender<Snapshot>,
    history: &mut Vec<EpochReport>,
) -> Option<StopReason> {
    let mut session = session.lock();

    let report = session.step_once();
    history.push(report);
    snapshots.send_replace(session.snapshot());

    if report.converged() {
        Some(StopReason::Converged)
    } else if session.trainer().exhausted() {
        Some(StopReason::EpochLimit)
    } else {
        None
    }
}
