//! Core library surface for the workout tracker.
//!
//! The data model, persistence store and editing protocol live here so the
//! `bin` target and the integration tests drive exactly the same code. The
//! terminal front-end is exposed through [`ui`].
pub mod config;
pub mod editing;
pub mod models;
pub mod session;
pub mod state;
pub mod store;
pub mod ui;

/// Convenience re-exports for the persistence layer.
pub use config::StoreConfig;
pub use store::{StoreError, StoreEvent, StoreWorker};

/// The three domain types that other layers manipulate.
pub use models::{Exercise, ExerciseSet, UpdateFrom, Workout};

pub use editing::EditSession;
pub use session::{Lifecycle, LoadStatus, SessionNotice, StoreSession};
pub use state::{StateChange, WorkoutState};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
