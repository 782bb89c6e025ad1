//! Ratatui front-end for the workout log. The UI only reads the shared
//! workout state and mutates it through staged edits; persistence is left to
//! the store session it was handed.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
