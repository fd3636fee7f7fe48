//! Pure battery rules. Every function leaves the state normalized:
//! level within `[0, max_capacity]`, `is_dead == (level <= 0)`, and no
//! charging flag on a full battery.

use super::types::{BatteryEvent, BatteryState, BatteryTier};
use crate::core::constants::MS_PER_HOUR;

/// Report of natural recovery applied on load.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OfflineRecovery {
    pub elapsed_ms: i64,
    /// Whole units earned by elapsed time, before clamping to capacity.
    pub recharge: f64,
    pub level_before: f64,
    pub level_after: f64,
}

/// Whole units of energy recovered over `elapsed_ms`.
pub fn offline_recharge_amount(elapsed_ms: i64, tier: BatteryTier) -> f64 {
    if elapsed_ms <= 0 {
        return 0.0;
    }
    let hours = elapsed_ms as f64 / MS_PER_HOUR;
    (hours * tier.recharge_per_hour()).floor()
}

/// Applies recovery for the time since `last_used`.
///
/// `last_used` only moves when whole units were earned, so partial hours keep
/// accumulating across short sessions without ever being counted twice.
pub fn apply_offline_recharge(state: &mut BatteryState, now_ms: i64) -> OfflineRecovery {
    let elapsed_ms = now_ms.saturating_sub(state.last_used);
    if elapsed_ms <= 0 {
        return OfflineRecovery {
            level_before: state.level,
            level_after: state.level,
            ..Default::default()
        };
    }

    let level_before = state.level;
    let recharge = offline_recharge_amount(elapsed_ms, state.tier());
    if recharge > 0.0 {
        state.level += recharge;
        state.last_used = now_ms;
    }
    state.normalize();

    OfflineRecovery {
        elapsed_ms,
        recharge,
        level_before,
        level_after: state.level,
    }
}

/// Drains `amount` scaled by the tier multiplier. Returns the energy removed.
pub fn apply_drain(state: &mut BatteryState, amount: f64, now_ms: i64) -> f64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0.0;
    }
    let before = state.level;
    state.level -= amount * state.tier().drain_multiplier();
    state.last_used = now_ms;
    state.normalize();
    before - state.level
}

/// One 1-second charging step. `None` when not charging.
pub fn apply_charge_tick(state: &mut BatteryState) -> Option<BatteryEvent> {
    if !state.is_charging {
        return None;
    }
    if state.is_full() {
        state.is_charging = false;
        return None;
    }

    state.level += state.tier().charge_per_tick();
    state.normalize();

    if state.is_full() {
        Some(BatteryEvent::FullyCharged { level: state.level })
    } else {
        Some(BatteryEvent::Charged { level: state.level })
    }
}

pub fn fill_to_capacity(state: &mut BatteryState) {
    state.level = state.max_capacity;
    state.is_dead = false;
    state.is_charging = false;
}

/// Switches tier, recomputing capacity and clamping the level.
pub fn apply_tier(state: &mut BatteryState, tier: BatteryTier) {
    state.is_premium = tier.is_premium();
    state.max_capacity = tier.max_capacity();
    state.normalize();
}
