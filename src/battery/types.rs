//! Battery data structures and tier definitions.

use crate::core::constants::*;
use serde::{Deserialize, Serialize};

/// Subscription tier. Premium gets more capacity, faster charging,
/// faster offline recovery and slower drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatteryTier {
    Standard,
    Premium,
}

impl BatteryTier {
    pub fn from_premium(is_premium: bool) -> Self {
        if is_premium {
            BatteryTier::Premium
        } else {
            BatteryTier::Standard
        }
    }

    pub fn is_premium(&self) -> bool {
        matches!(self, BatteryTier::Premium)
    }

    pub fn max_capacity(&self) -> f64 {
        match self {
            BatteryTier::Standard => STANDARD_MAX_CAPACITY,
            BatteryTier::Premium => PREMIUM_MAX_CAPACITY,
        }
    }

    pub fn recharge_per_hour(&self) -> f64 {
        match self {
            BatteryTier::Standard => STANDARD_RECHARGE_PER_HOUR,
            BatteryTier::Premium => PREMIUM_RECHARGE_PER_HOUR,
        }
    }

    pub fn drain_multiplier(&self) -> f64 {
        match self {
            BatteryTier::Standard => STANDARD_DRAIN_MULTIPLIER,
            BatteryTier::Premium => PREMIUM_DRAIN_MULTIPLIER,
        }
    }

    pub fn charge_per_tick(&self) -> f64 {
        match self {
            BatteryTier::Standard => STANDARD_CHARGE_PER_TICK,
            BatteryTier::Premium => PREMIUM_CHARGE_PER_TICK,
        }
    }
}

/// Persisted battery state. Field names match the stored JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryState {
    pub level: f64,
    pub is_charging: bool,
    pub is_dead: bool,
    /// Epoch milliseconds of the last drain/reset (or applied offline recovery).
    pub last_used: i64,
    pub max_capacity: f64,
    pub is_premium: bool,
}

impl BatteryState {
    /// A full battery for the given tier.
    pub fn full(tier: BatteryTier, now_ms: i64) -> Self {
        Self {
            level: tier.max_capacity(),
            is_charging: false,
            is_dead: false,
            last_used: now_ms,
            max_capacity: tier.max_capacity(),
            is_premium: tier.is_premium(),
        }
    }

    pub fn tier(&self) -> BatteryTier {
        BatteryTier::from_premium(self.is_premium)
    }

    pub fn is_full(&self) -> bool {
        self.level >= self.max_capacity
    }

    /// Level as a percentage of capacity (0-100).
    pub fn percentage(&self) -> f64 {
        if self.max_capacity <= 0.0 {
            return 0.0;
        }
        (self.level / self.max_capacity * 100.0).clamp(0.0, 100.0)
    }

    /// Whether a stored state is usable at all. Anything else is treated as
    /// if nothing had been stored.
    pub fn is_well_formed(&self) -> bool {
        self.level.is_finite()
            && self.max_capacity.is_finite()
            && self.max_capacity > 0.0
            && self.last_used >= 0
    }

    /// Re-establish the level bounds and the flags derived from the level.
    pub fn normalize(&mut self) {
        self.level = self.level.clamp(0.0, self.max_capacity);
        self.is_dead = self.level <= 0.0;
        if self.is_full() {
            self.is_charging = false;
        }
    }
}

/// Something observable that happened while advancing the battery.
#[derive(Debug, Clone, PartialEq)]
pub enum BatteryEvent {
    /// One charging tick landed.
    Charged { level: f64 },
    /// Charging reached capacity and stopped on its own.
    FullyCharged { level: f64 },
}
