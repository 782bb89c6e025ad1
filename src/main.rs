//! Binary entry point: resolve the storage location, start the store session,
//! drive the Ratatui event loop, and save once more on the way out.
use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use workout_tracker::{run_app, App, SessionNotice, StoreConfig, StoreSession};

/// Persistence problems are reported, never fatal: the final save outcome is
/// printed after the terminal has been restored.
fn main() -> Result<()> {
    let config = StoreConfig::from_platform().context("failed to resolve data directory")?;
    init_logging(&config)?;
    log::info!("using data file {}", config.data_file().display());

    let session = StoreSession::start(config).context("failed to start workout store")?;
    let mut app = App::new(session);
    let run_result = run_app(&mut app);

    for notice in app.into_session().shutdown() {
        match notice {
            SessionNotice::Info(text) => log::info!("{text}"),
            SessionNotice::Error(text) => {
                log::error!("{text}");
                eprintln!("{text}");
            }
        }
    }

    run_result
}

/// Send log output to a file next to the data file; stderr belongs to the TUI.
/// `RUST_LOG` overrides the default `info` level.
fn init_logging(config: &StoreConfig) -> Result<()> {
    fs::create_dir_all(config.data_dir()).context("failed to create data directory")?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())
        .context("failed to open log file")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}
