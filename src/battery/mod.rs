//! Battery system: a bounded energy resource that drains with use,
//! recovers while the app is closed, and charges on a 1-second cadence.
//!
//! State survives restarts through a [`BatteryStore`]; the premium tier
//! raises capacity, speeds up charging and recovery, and halves drain.

pub mod engine;
pub mod logic;
pub mod persistence;
pub mod types;

pub use engine::BatteryEngine;
pub use logic::OfflineRecovery;
pub use persistence::{BatteryStore, JsonFileStore, MemoryStore};
pub use types::{BatteryEvent, BatteryState, BatteryTier};
