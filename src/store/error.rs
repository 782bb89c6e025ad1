use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while moving the workout log to or from disk.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage location unavailable: {reason}")]
    StorageUnavailable {
        reason: String,
        #[source]
        source: Option<io::Error>,
    },
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("workout data at {} is not valid", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("set weight {weight} in {workout} / {exercise} cannot be stored")]
    NonFiniteWeight {
        workout: String,
        exercise: String,
        weight: f32,
    },
    #[error("failed to encode workouts")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("the storage worker is no longer running")]
    WorkerStopped,
}

impl StoreError {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::StorageUnavailable {
            reason: reason.into(),
            source: None,
        }
    }
}
