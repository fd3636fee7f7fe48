//! Live sessions: simulated viewer counts and emoji reactions per
//! conversation, used as social proof in the inbox and chat views.
//!
//! Nothing here talks to real users. Audience numbers drift on a 3-second
//! cadence scaled by each chat's hotness, random reactions are rolled every
//! 4 seconds, and every reaction removes itself 5 seconds after it appears.

pub mod logic;
pub mod simulator;
pub mod types;

pub use simulator::LiveSessionSimulator;
pub use types::{LiveEvent, LiveSession, Reaction};
