//! Stateful battery engine: owns the state, its store, and the charging
//! cadence. Every change is written through to the store.

use super::logic::{
    apply_charge_tick, apply_drain, apply_offline_recharge, apply_tier, fill_to_capacity,
    OfflineRecovery,
};
use super::persistence::BatteryStore;
use super::types::{BatteryEvent, BatteryState, BatteryTier};
use crate::core::clock::{Clock, SystemClock};
use crate::core::constants::CHARGE_TICK_MS;
use crate::core::timing::Cadence;
use tracing::{debug, info, warn};

pub struct BatteryEngine<S: BatteryStore, C: Clock = SystemClock> {
    state: BatteryState,
    store: S,
    clock: C,
    /// Milliseconds of driver time seen by `advance`.
    run_ms: i64,
    charge_cadence: Cadence,
    last_recovery: Option<OfflineRecovery>,
}

impl<S: BatteryStore> BatteryEngine<S, SystemClock> {
    /// Load (or create) the battery using wall-clock time.
    pub fn load(store: S, is_premium: bool) -> Self {
        Self::initialize(store, SystemClock, is_premium)
    }
}

impl<S: BatteryStore, C: Clock> BatteryEngine<S, C> {
    /// Restore persisted state, applying natural recovery for the time since
    /// it was last used. Absent or malformed state starts a full battery.
    pub fn initialize(store: S, clock: C, is_premium: bool) -> Self {
        let now = clock.now_ms();
        let tier = BatteryTier::from_premium(is_premium);

        let (state, last_recovery) = match store.load() {
            Some(mut state) => {
                apply_tier(&mut state, tier);
                let recovery = apply_offline_recharge(&mut state, now);
                if recovery.recharge > 0.0 {
                    info!(
                        "Battery recovered {} while away ({:.0} -> {:.0})",
                        recovery.recharge, recovery.level_before, recovery.level_after
                    );
                }
                (state, Some(recovery))
            }
            None => {
                info!("No saved battery, starting full ({:?})", tier);
                (BatteryState::full(tier, now), None)
            }
        };

        let mut engine = Self {
            state,
            store,
            clock,
            run_ms: 0,
            charge_cadence: Cadence::starting_at(CHARGE_TICK_MS, 0),
            last_recovery,
        };
        engine.persist();
        engine
    }

    pub fn state(&self) -> &BatteryState {
        &self.state
    }

    pub fn percentage(&self) -> f64 {
        self.state.percentage()
    }

    pub fn is_dead(&self) -> bool {
        self.state.is_dead
    }

    /// Recovery applied by `initialize`, if a saved state was found.
    pub fn last_recovery(&self) -> Option<&OfflineRecovery> {
        self.last_recovery.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Use up energy. Returns the amount actually removed.
    pub fn drain(&mut self, amount: f64) -> f64 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let was_dead = self.state.is_dead;
        let removed = apply_drain(&mut self.state, amount, self.clock.now_ms());
        debug!("Drained {} (level {:.1})", removed, self.state.level);
        if self.state.is_dead && !was_dead {
            info!("Battery died");
        }
        self.persist();
        removed
    }

    pub fn drain_one(&mut self) -> f64 {
        self.drain(1.0)
    }

    /// Returns false when already charging or already full.
    pub fn start_charging(&mut self) -> bool {
        if self.state.is_charging || self.state.is_full() {
            return false;
        }
        self.state.is_charging = true;
        self.charge_cadence.restart(self.run_ms);
        self.persist();
        true
    }

    pub fn stop_charging(&mut self) -> bool {
        if !self.state.is_charging {
            return false;
        }
        self.state.is_charging = false;
        self.persist();
        true
    }

    /// Runs the 1-second charging cadence over `elapsed_ms` of driver time.
    pub fn advance(&mut self, elapsed_ms: i64) -> Vec<BatteryEvent> {
        let mut events = Vec::new();
        if elapsed_ms <= 0 {
            return events;
        }
        let target = self.run_ms.saturating_add(elapsed_ms);

        while self.state.is_charging && self.charge_cadence.is_due(target) {
            self.run_ms = self.charge_cadence.fire();
            if let Some(event) = apply_charge_tick(&mut self.state) {
                if let BatteryEvent::FullyCharged { level } = &event {
                    info!("Battery fully charged at {:.0}", level);
                }
                events.push(event);
            }
            self.persist();
        }

        self.run_ms = target;
        events
    }

    /// Paid boost: full immediately, no ticks.
    pub fn instant_charge(&mut self) {
        fill_to_capacity(&mut self.state);
        self.persist();
    }

    pub fn reset(&mut self) {
        fill_to_capacity(&mut self.state);
        self.state.last_used = self.clock.now_ms();
        self.persist();
    }

    /// Tier changes are supplied from outside (subscription status).
    pub fn set_premium(&mut self, is_premium: bool) {
        if self.state.is_premium == is_premium {
            return;
        }
        apply_tier(&mut self.state, BatteryTier::from_premium(is_premium));
        self.persist();
    }

    /// Full overwrite of the stored state. Failures are logged only; the
    /// in-memory state stays authoritative.
    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.state) {
            warn!("Failed to save battery state: {}", e);
        }
    }
}
