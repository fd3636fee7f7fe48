//! chatwatch - simulation backend for the voyeur messaging phone.
//!
//! Two independent simulations feed the phone UI: a gamified battery that
//! gates how much the user can watch, and live sessions that fake an
//! audience around each conversation. Both run on caller-supplied time and
//! randomness so every behavior can be replayed in tests.

pub mod battery;
pub mod build_info;
pub mod core;
pub mod live;
pub mod phone;
pub mod simulator;
pub mod story;
pub mod utils;

#[cfg(feature = "web")]
pub mod web;

pub use battery::{BatteryEngine, BatteryState, BatteryTier};
pub use crate::core::constants::*;
pub use live::{LiveSession, LiveSessionSimulator, Reaction};
pub use phone::{Command, Phone, Snapshot};
