//! Battery storage backends.
//!
//! A store only moves whole snapshots: `save` overwrites, `load` returns the
//! last snapshot or `None` when nothing usable was stored.

use super::types::BatteryState;
use crate::core::constants::BATTERY_STORAGE_KEY;
use crate::utils::persistence::{decode_json, read_json, save_path, write_json, PersistError};
use std::path::{Path, PathBuf};

pub trait BatteryStore {
    fn load(&self) -> Option<BatteryState>;
    fn save(&mut self, state: &BatteryState) -> Result<(), PersistError>;
}

/// Reject shapes that parse but cannot describe a battery.
fn accept(state: BatteryState) -> Option<BatteryState> {
    if state.is_well_formed() {
        Some(state)
    } else {
        tracing::warn!("Discarding saved battery state with invalid numbers");
        None
    }
}

/// JSON file on disk, by default `battery_state.json` in the data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the fixed key inside the platform data directory.
    pub fn default_location() -> Result<Self, PersistError> {
        Ok(Self::new(save_path(BATTERY_STORAGE_KEY)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BatteryStore for JsonFileStore {
    fn load(&self) -> Option<BatteryState> {
        read_json(&self.path).and_then(accept)
    }

    fn save(&mut self, state: &BatteryState) -> Result<(), PersistError> {
        write_json(&self.path, state)
    }
}

/// Keeps the serialized JSON in memory. Useful for tests and for embedding
/// in a host that owns its own storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw stored text, which may be malformed.
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
            saves: 0,
        }
    }

    pub fn with_state(state: &BatteryState) -> Self {
        Self {
            json: serde_json::to_string(state).ok(),
            saves: 0,
        }
    }

    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }

    /// Number of successful saves since construction.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl BatteryStore for MemoryStore {
    fn load(&self) -> Option<BatteryState> {
        self.json
            .as_deref()
            .and_then(decode_json::<BatteryState>)
            .and_then(accept)
    }

    fn save(&mut self, state: &BatteryState) -> Result<(), PersistError> {
        self.json = Some(serde_json::to_string(state)?);
        self.saves += 1;
        Ok(())
    }
}

impl<S: BatteryStore + ?Sized> BatteryStore for Box<S> {
    fn load(&self) -> Option<BatteryState> {
        (**self).load()
    }

    fn save(&mut self, state: &BatteryState) -> Result<(), PersistError> {
        (**self).save(state)
    }
}
