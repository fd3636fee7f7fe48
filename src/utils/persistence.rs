//! Generic JSON persistence helpers for chatwatch save files.

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("could not determine a data directory")]
    NoDataDir,

    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Platform data directory for chatwatch, created if needed.
pub fn data_dir() -> Result<PathBuf, PersistError> {
    let dirs = ProjectDirs::from("", "", "chatwatch").ok_or(PersistError::NoDataDir)?;
    let dir = dirs.data_dir().to_path_buf();
    fs::create_dir_all(&dir).map_err(|source| PersistError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Full path for a save file in the data directory.
pub fn save_path(filename: &str) -> Result<PathBuf, PersistError> {
    Ok(data_dir()?.join(filename))
}

/// Decode JSON text, treating anything malformed as absent.
pub fn decode_json<T: DeserializeOwned>(json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Discarding malformed saved state: {}", e);
            None
        }
    }
}

/// Read a JSON file. Missing, unreadable, or malformed files yield `None`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    match fs::read_to_string(path) {
        Ok(json) => decode_json(&json),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No saved state at {}", path.display());
            None
        }
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            None
        }
    }
}

/// Write a value as pretty-printed JSON, replacing any previous contents.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(data)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PersistError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}
