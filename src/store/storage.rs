use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::models::Workout;

use super::StoreError;

/// Resolve the absolute path of the workout file. The directory does not have
/// to exist yet (first run), but if something other than a directory sits at
/// that path the location is unusable.
pub fn resolve_storage_location(config: &StoreConfig) -> Result<PathBuf, StoreError> {
    let dir = config.data_dir();
    if dir.exists() && !dir.is_dir() {
        return Err(StoreError::unavailable(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    Ok(config.data_file())
}

/// Serialize the full collection as a JSON array. JSON has no encoding for
/// infinite or NaN weights, so those are refused instead of written as `null`.
pub fn encode(workouts: &[Workout]) -> Result<Vec<u8>, StoreError> {
    for workout in workouts {
        for exercise in &workout.exercises {
            if let Some(set) = exercise.sets.iter().find(|set| !set.weight_in_kg.is_finite()) {
                return Err(StoreError::NonFiniteWeight {
                    workout: workout.name.clone(),
                    exercise: exercise.name.clone(),
                    weight: set.weight_in_kg,
                });
            }
        }
    }
    serde_json::to_vec_pretty(workouts).map_err(StoreError::Encode)
}

/// Parse bytes previously produced by [`encode`]. `path` is only used to
/// describe where the bytes came from.
pub fn decode(bytes: &[u8], path: &Path) -> Result<Vec<Workout>, StoreError> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the collection stored at `path`. A missing file is the normal
/// first-run state and yields an empty collection.
pub fn load_from(path: &Path) -> Result<Vec<Workout>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    decode(&bytes, path)
}

/// Replace the file at `path` with the encoded collection and return how many
/// workouts were written. The bytes go to a sibling temp file first and are
/// renamed into place, so a crash mid-write never leaves a truncated file.
pub fn save_to(path: &Path, workouts: &[Workout]) -> Result<usize, StoreError> {
    let bytes = encode(workouts)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::StorageUnavailable {
            reason: format!("failed to create {}", parent.display()),
            source: Some(source),
        })?;
    }

    let temp_path = temp_path_for(path);
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    let written = fs::write(&temp_path, &bytes).and_then(|()| fs::rename(&temp_path, path));
    if let Err(source) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(source));
    }

    Ok(workouts.len())
}

/// Resolve the location from `config` and load it.
pub fn load(config: &StoreConfig) -> Result<Vec<Workout>, StoreError> {
    let path = resolve_storage_location(config)?;
    load_from(&path)
}

/// Resolve the location from `config` and save to it.
pub fn save(config: &StoreConfig, workouts: &[Workout]) -> Result<usize, StoreError> {
    let path = resolve_storage_location(config)?;
    save_to(&path, workouts)
}

pub(crate) fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
