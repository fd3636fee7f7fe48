//! Simulation configuration.

use crate::core::constants::TICK_INTERVAL_MS;

/// Configuration for a headless simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Simulated time to run, in milliseconds
    pub duration_ms: i64,

    /// Scheduler step; both simulations advance by this much per tick
    pub step_ms: i64,

    /// Conversations to seed live sessions for
    pub chat_ids: Vec<String>,

    pub is_premium: bool,

    /// How often the watching user spends one unit of energy
    pub drain_every_ms: i64,

    /// How often the watching user reacts on a random chat (0 = never)
    pub react_every_ms: i64,

    /// Plug in as soon as the battery dies
    pub auto_charge: bool,

    /// Log verbosity (0 = silent, 1 = summary, 2 = every event)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            duration_ms: 10 * 60 * 1000,
            step_ms: TICK_INTERVAL_MS as i64,
            chat_ids: (1..=6).map(|i| i.to_string()).collect(),
            is_premium: false,
            drain_every_ms: 5_000,
            react_every_ms: 7_000,
            auto_charge: true,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Heavy user burning through a standard battery
    pub fn binge_session(minutes: i64) -> Self {
        Self {
            duration_ms: minutes * 60 * 1000,
            drain_every_ms: 2_000,
            ..Default::default()
        }
    }

    /// Same habits on the premium tier, for comparison
    pub fn premium_binge_session(minutes: i64) -> Self {
        Self {
            is_premium: true,
            ..Self::binge_session(minutes)
        }
    }

    /// Quiet watcher who never drains or reacts; only the crowd moves
    pub fn lurker(minutes: i64) -> Self {
        Self {
            duration_ms: minutes * 60 * 1000,
            drain_every_ms: 0,
            react_every_ms: 0,
            ..Default::default()
        }
    }
}
