use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::config::StoreConfig;
use crate::models::Workout;

use super::{storage, StoreError};

/// Work queued for the storage thread.
enum Job {
    Load,
    Save(Vec<Workout>),
}

/// Outcome of a queued job, delivered back to whoever polls the worker.
#[derive(Debug)]
pub enum StoreEvent {
    Loaded(Result<Vec<Workout>, StoreError>),
    Saved(Result<usize, StoreError>),
}

/// Runs loads and saves on a dedicated thread.
///
/// Jobs are handled strictly one at a time in submission order, so a save can
/// never interleave with another save or a load. Results are not pushed into
/// any shared state: the owning thread collects them with [`StoreWorker::poll`]
/// or [`StoreWorker::wait`] and applies them itself.
pub struct StoreWorker {
    jobs: Option<Sender<Job>>,
    events: Receiver<StoreEvent>,
    handle: Option<JoinHandle<()>>,
}

impl StoreWorker {
    pub fn spawn(config: StoreConfig) -> Result<Self, StoreError> {
        let (job_tx, job_rx) = unbounded::<Job>();
        let (event_tx, event_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("workout-store".into())
            .spawn(move || run_jobs(config, job_rx, event_tx))
            .map_err(|source| StoreError::StorageUnavailable {
                reason: "failed to start storage thread".into(),
                source: Some(source),
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            events: event_rx,
            handle: Some(handle),
        })
    }

    /// Queue a load of the whole collection.
    pub fn load(&self) -> Result<(), StoreError> {
        self.submit(Job::Load)
    }

    /// Queue a save of `workouts`. The caller hands over a snapshot, so later
    /// edits do not leak into the write.
    pub fn save(&self, workouts: Vec<Workout>) -> Result<(), StoreError> {
        self.submit(Job::Save(workouts))
    }

    /// Collect every finished job without blocking.
    pub fn poll(&self) -> Vec<StoreEvent> {
        self.events.try_iter().collect()
    }

    /// Block until the next job finishes or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Result<Option<StoreEvent>, StoreError> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(StoreError::WorkerStopped),
        }
    }

    /// Stop accepting jobs, let queued ones finish, and return whatever
    /// results nobody has collected yet.
    pub fn shutdown(&mut self) -> Vec<StoreEvent> {
        self.stop();
        self.poll()
    }

    fn submit(&self, job: Job) -> Result<(), StoreError> {
        let jobs = self.jobs.as_ref().ok_or(StoreError::WorkerStopped)?;
        jobs.send(job).map_err(|_| StoreError::WorkerStopped)
    }

    fn stop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("storage thread panicked");
            }
        }
    }
}

impl Drop for StoreWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_jobs(config: StoreConfig, jobs: Receiver<Job>, events: Sender<StoreEvent>) {
    for job in jobs {
        let event = match job {
            Job::Load => {
                let result = storage::load(&config);
                match &result {
                    Ok(workouts) => log::info!("loaded {} workout(s)", workouts.len()),
                    Err(err) => log::error!("failed to load workouts: {err}"),
                }
                StoreEvent::Loaded(result)
            }
            Job::Save(workouts) => {
                let result = storage::save(&config, &workouts);
                match &result {
                    Ok(count) => log::info!("saved {count} workout(s)"),
                    Err(err) => log::error!("failed to save workouts: {err}"),
                }
                StoreEvent::Saved(result)
            }
        };

        if events.send(event).is_err() {
            break;
        }
    }
    log::debug!("storage thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_workouts;
    use tempfile::tempdir;

    const WAIT: Duration = Duration::from_secs(5);

    fn next(worker: &StoreWorker) -> StoreEvent {
        worker
            .wait(WAIT)
            .unwrap()
            .expect("worker did not answer in time")
    }

    #[test]
    fn first_load_is_empty() {
        let dir = tempdir().unwrap();
        let worker = StoreWorker::spawn(StoreConfig::at(dir.path())).unwrap();
        worker.load().unwrap();

        match next(&worker) {
            StoreEvent::Loaded(Ok(workouts)) => assert!(workouts.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn jobs_run_in_submission_order() {
        let dir = tempdir().unwrap();
        let worker = StoreWorker::spawn(StoreConfig::at(dir.path())).unwrap();
        let workouts = sample_workouts();

        worker.save(workouts.clone()).unwrap();
        worker.load().unwrap();

        match next(&worker) {
            StoreEvent::Saved(Ok(count)) => assert_eq!(count, 2),
            other => panic!("unexpected event: {other:?}"),
        }
        match next(&worker) {
            StoreEvent::Loaded(Ok(loaded)) => assert_eq!(loaded, workouts),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn shutdown_finishes_queued_saves() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::at(dir.path());
        let mut worker = StoreWorker::spawn(config.clone()).unwrap();

        worker.save(sample_workouts()).unwrap();
        let events = worker.shutdown();

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StoreEvent::Saved(Ok(2))));
        assert!(config.data_file().is_file());
    }

    #[test]
    fn jobs_after_shutdown_are_rejected() {
        let dir = tempdir().unwrap();
        let mut worker = StoreWorker::spawn(StoreConfig::at(dir.path())).unwrap();
        worker.shutdown();
        assert!(matches!(worker.load(), Err(StoreError::WorkerStopped)));
    }

    #[test]
    fn decode_failure_is_reported() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::at(dir.path());
        std::fs::write(config.data_file(), b"garbage").unwrap();
        let worker = StoreWorker::spawn(config).unwrap();
        worker.load().unwrap();

        assert!(matches!(
            next(&worker),
            StoreEvent::Loaded(Err(StoreError::Decode { .. }))
        ));
    }
}
