//! Persistence for the workout collection, split into the synchronous file
//! routines and the background worker that runs them off the UI thread.

mod error;
mod storage;
mod worker;

pub use error::StoreError;
pub use storage::{
    decode, encode, load, load_from, resolve_storage_location, save, save_to,
};
pub use worker::{StoreEvent, StoreWorker};
