//! Headless simulation runner.
//!
//! Drives a [`Phone`] on a manual clock with a scripted watcher: drain on a
//! fixed cadence, react now and then, plug in when the battery dies.
//! Statistics are collected from the events each tick returns.

use super::config::SimConfig;
use super::report::{SessionSummary, SimReport};
use crate::battery::{BatteryEngine, BatteryEvent, MemoryStore};
use crate::core::clock::ManualClock;
use crate::core::constants::REACTION_PALETTE;
use crate::core::timing::Cadence;
use crate::live::{LiveEvent, LiveSessionSimulator};
use crate::phone::{Command, Phone, PhoneEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Fixed start of simulated time (2023-11-14T22:13:20Z) so reports are stable.
pub const SIM_EPOCH_MS: i64 = 1_700_000_000_000;

/// Counters accumulated from tick events and scripted actions.
#[derive(Debug, Default)]
struct SimStats {
    drains: u64,
    deaths: u64,
    charge_sessions: u64,
    charge_ticks: u64,
    full_charges: u64,
    dead_ms: i64,
    min_level: f64,
    viewer_changes: u64,
    random_reactions: u64,
    user_reactions: u64,
    expired_reactions: u64,
}

impl SimStats {
    fn record(&mut self, event: &PhoneEvent) {
        match event {
            PhoneEvent::Battery(BatteryEvent::Charged { .. }) => self.charge_ticks += 1,
            PhoneEvent::Battery(BatteryEvent::FullyCharged { .. }) => {
                self.charge_ticks += 1;
                self.full_charges += 1;
            }
            PhoneEvent::Live(LiveEvent::ViewersChanged { .. }) => self.viewer_changes += 1,
            PhoneEvent::Live(LiveEvent::ReactionAdded { .. }) => self.random_reactions += 1,
            PhoneEvent::Live(LiveEvent::ReactionExpired { .. }) => self.expired_reactions += 1,
        }
    }
}

/// Run one simulation and return its report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    // The watcher script gets its own stream so scripted choices do not
    // shift the crowd simulation.
    let mut user_rng = StdRng::seed_from_u64(rng.gen());

    let clock = ManualClock::new(SIM_EPOCH_MS);
    let battery = BatteryEngine::initialize(MemoryStore::new(), clock.clone(), config.is_premium);
    let live = LiveSessionSimulator::initialize(&config.chat_ids, SIM_EPOCH_MS, &mut rng);
    let mut phone = Phone::new(battery, live, rng);

    info!(
        "Simulating {}s over {} chats (seed {})",
        config.duration_ms / 1000,
        config.chat_ids.len(),
        seed
    );

    let mut stats = SimStats {
        min_level: phone.battery().state().level,
        ..Default::default()
    };
    let mut drain_cadence =
        (config.drain_every_ms > 0).then(|| Cadence::starting_at(config.drain_every_ms, 0));
    let mut react_cadence =
        (config.react_every_ms > 0).then(|| Cadence::starting_at(config.react_every_ms, 0));

    let step_ms = config.step_ms.max(1);
    let mut elapsed = 0;
    while elapsed < config.duration_ms {
        let step = step_ms.min(config.duration_ms - elapsed);
        elapsed += step;
        clock.advance(step);

        if phone.battery().is_dead() {
            stats.dead_ms += step;
        }

        for event in phone.tick(step) {
            if config.verbosity >= 2 {
                println!("[{:>8}ms] {:?}", elapsed, event);
            }
            stats.record(&event);
        }

        if let Some(cadence) = drain_cadence.as_mut() {
            while cadence.is_due(elapsed) {
                cadence.fire();
                if phone.battery().is_dead() {
                    continue;
                }
                if phone.apply(Command::Drain { amount: None }) {
                    stats.drains += 1;
                }
                if phone.battery().is_dead() {
                    stats.deaths += 1;
                    debug!("Battery died at {}ms", elapsed);
                    if config.auto_charge && phone.apply(Command::StartCharging) {
                        stats.charge_sessions += 1;
                    }
                }
            }
        }

        if let Some(cadence) = react_cadence.as_mut() {
            while cadence.is_due(elapsed) {
                cadence.fire();
                if phone.battery().is_dead() || config.chat_ids.is_empty() {
                    continue;
                }
                let chat_id = &config.chat_ids[user_rng.gen_range(0..config.chat_ids.len())];
                let emoji = REACTION_PALETTE[user_rng.gen_range(0..REACTION_PALETTE.len())];
                if phone.apply(Command::React {
                    chat_id: chat_id.clone(),
                    emoji: emoji.to_string(),
                }) {
                    stats.user_reactions += 1;
                }
            }
        }

        stats.min_level = stats.min_level.min(phone.battery().state().level);
    }

    build_report(config, seed, &stats, &phone)
}

fn build_report<R: Rng>(
    config: &SimConfig,
    seed: u64,
    stats: &SimStats,
    phone: &Phone<MemoryStore, ManualClock, R>,
) -> SimReport {
    let battery = phone.battery().state();
    let sessions = phone
        .live()
        .sessions()
        .map(|s| SessionSummary {
            chat_id: s.chat_id.clone(),
            hotness: s.hotness,
            final_viewers: s.viewer_count,
            peak_viewers: s.peak_viewers,
            live_reactions: s.reactions.len(),
        })
        .collect();
    let trending = phone
        .live()
        .trending_chats()
        .into_iter()
        .map(|s| s.chat_id.clone())
        .collect();

    SimReport {
        seed,
        duration_ms: config.duration_ms,
        is_premium: config.is_premium,
        final_level: battery.level,
        max_capacity: battery.max_capacity,
        min_level: stats.min_level,
        drains: stats.drains,
        deaths: stats.deaths,
        dead_ms: stats.dead_ms,
        charge_sessions: stats.charge_sessions,
        charge_ticks: stats.charge_ticks,
        full_charges: stats.full_charges,
        viewer_changes: stats.viewer_changes,
        random_reactions: stats.random_reactions,
        user_reactions: stats.user_reactions,
        expired_reactions: stats.expired_reactions,
        sessions,
        trending,
    }
}
