//! Ties the in-memory collection to the storage worker. A [`StoreSession`] is
//! created once by the binary and passed to the UI; it owns the startup load,
//! lifecycle-driven saves, and the final save on shutdown.

use std::error::Error;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::state::WorkoutState;
use crate::store::{StoreError, StoreEvent, StoreWorker};

/// Application lifecycle phases reported by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Inactive,
    Background,
}

/// Where the session stands with respect to the startup load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Ready,
    /// The stored file could not be read. The in-memory collection is kept
    /// and automatic saves are suppressed so the file is not overwritten.
    Failed,
}

/// Something the UI should tell the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    Info(String),
    Error(String),
}

pub struct StoreSession {
    state: WorkoutState,
    worker: StoreWorker,
    status: LoadStatus,
    phase: Lifecycle,
}

impl StoreSession {
    /// Spawn the storage worker and queue the initial load.
    pub fn start(config: StoreConfig) -> Result<Self, StoreError> {
        let worker = StoreWorker::spawn(config)?;
        worker.load()?;
        Ok(Self {
            state: WorkoutState::new(),
            worker,
            status: LoadStatus::Pending,
            phase: Lifecycle::Active,
        })
    }

    pub fn state(&self) -> &WorkoutState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut WorkoutState {
        &mut self.state
    }

    pub fn load_status(&self) -> LoadStatus {
        self.status
    }

    /// Edits are only safe once the startup load has been applied; before that
    /// a late load would silently replace them.
    pub fn is_ready(&self) -> bool {
        self.status != LoadStatus::Pending
    }

    /// Apply every finished storage job to the state.
    pub fn poll(&mut self) -> Vec<SessionNotice> {
        self.worker
            .poll()
            .into_iter()
            .map(|event| self.apply(event))
            .collect()
    }

    /// Block until the startup load has landed (or `timeout` elapses).
    pub fn wait_until_ready(
        &mut self,
        timeout: Duration,
    ) -> Result<Vec<SessionNotice>, StoreError> {
        let mut notices = Vec::new();
        while !self.is_ready() {
            match self.worker.wait(timeout)? {
                Some(event) => notices.push(self.apply(event)),
                None => break,
            }
        }
        Ok(notices)
    }

    /// Record a lifecycle transition. Moving away from `Active` saves the
    /// whole collection. Returns whether a save was queued.
    pub fn on_lifecycle(&mut self, phase: Lifecycle) -> Result<bool, StoreError> {
        let previous = std::mem::replace(&mut self.phase, phase);
        if previous == phase || phase == Lifecycle::Active {
            return Ok(false);
        }
        self.save_now()
    }

    /// Queue a save of the current collection if saving is allowed.
    pub fn save_now(&mut self) -> Result<bool, StoreError> {
        if self.status != LoadStatus::Ready {
            log::warn!("skipping save: workouts were not loaded ({:?})", self.status);
            return Ok(false);
        }
        self.worker.save(self.state.snapshot())?;
        Ok(true)
    }

    /// Final save, then stop the worker and report what happened.
    pub fn shutdown(mut self) -> Vec<SessionNotice> {
        let mut notices = Vec::new();
        if let Err(err) = self.save_now() {
            notices.push(SessionNotice::Error(format!("Save failed: {err}")));
        }
        let events = self.worker.shutdown();
        for event in events {
            let notice = self.apply(event);
            notices.push(notice);
        }
        notices
    }

    fn apply(&mut self, event: StoreEvent) -> SessionNotice {
        match event {
            StoreEvent::Loaded(Ok(workouts)) => {
                let count = workouts.len();
                self.state.replace_all(workouts);
                self.status = LoadStatus::Ready;
                SessionNotice::Info(format!("Loaded {count} workout(s)."))
            }
            StoreEvent::Loaded(Err(err)) => {
                self.status = LoadStatus::Failed;
                SessionNotice::Error(format!("Could not load workouts: {}", root_cause(&err)))
            }
            StoreEvent::Saved(Ok(count)) => {
                SessionNotice::Info(format!("Saved {count} workout(s)."))
            }
            StoreEvent::Saved(Err(err)) => {
                SessionNotice::Error(format!("Save failed: {}", root_cause(&err)))
            }
        }
    }
}

fn root_cause(err: &StoreError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message = format!("{message}: {cause}");
        source = cause.source();
    }
    message
}
