//! Where the application keeps its files. The default location comes from the
//! platform's per-user data directory; tests point the store at a scratch
//! directory with [`StoreConfig::at`].

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::store::StoreError;

/// Qualifier, organization and application triple handed to `directories`.
const APP_QUALIFIER: &str = "";
const APP_ORGANIZATION: &str = "";
const APP_NAME: &str = "workout-tracker";
/// File holding the serialized workout collection.
pub const DATA_FILE_NAME: &str = "workouts.data";
/// Log file written next to the data file while the TUI owns the terminal.
pub const LOG_FILE_NAME: &str = "workout-tracker.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_dir: PathBuf,
    file_name: String,
}

impl StoreConfig {
    /// Resolve the per-user application data directory.
    pub fn from_platform() -> Result<Self, StoreError> {
        let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .ok_or_else(|| StoreError::unavailable("could not locate home directory"))?;
        Ok(Self::at(dirs.data_dir()))
    }

    /// Keep all files inside `data_dir`.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_name: DATA_FILE_NAME.to_string(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_in_data_dir() {
        let config = StoreConfig::at("/tmp/workouts-test");
        assert_eq!(
            config.data_file(),
            PathBuf::from("/tmp/workouts-test/workouts.data")
        );
        assert_eq!(
            config.log_file(),
            PathBuf::from("/tmp/workouts-test/workout-tracker.log")
        );
    }
}
