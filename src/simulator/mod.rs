//! Headless simulator for tuning the battery and crowd numbers.
//!
//! Runs a scripted watcher against the real engines on a manual clock and
//! reports how long the battery lasts, how often it dies, and how busy the
//! simulated crowd looks.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{SessionSummary, SimReport};
pub use runner::{run_simulation, SIM_EPOCH_MS};
