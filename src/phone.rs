//! The simulated phone: one battery and one set of live sessions driven by
//! the same scheduler, plus the command and snapshot types the UI speaks.

use crate::battery::{BatteryEngine, BatteryEvent, BatteryState, BatteryStore};
use crate::core::clock::Clock;
use crate::live::{LiveEvent, LiveSession, LiveSessionSimulator};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A mutation requested by the UI. Wire form is internally tagged JSON,
/// e.g. `{"type": "react", "chatId": "3", "emoji": "🔥"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    Drain {
        #[serde(default)]
        amount: Option<f64>,
    },
    StartCharging,
    StopCharging,
    InstantCharge,
    Reset,
    Join {
        #[serde(rename = "chatId")]
        chat_id: String,
    },
    Leave {
        #[serde(rename = "chatId")]
        chat_id: String,
    },
    React {
        #[serde(rename = "chatId")]
        chat_id: String,
        emoji: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhoneEvent {
    Battery(BatteryEvent),
    Live(LiveEvent),
}

/// Read-only view pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub now_ms: i64,
    pub battery: BatteryState,
    pub sessions: Vec<LiveSession>,
    /// Chat ids of the hottest sessions, hottest first.
    pub trending: Vec<String>,
}

pub struct Phone<S: BatteryStore, C: Clock, R: Rng> {
    battery: BatteryEngine<S, C>,
    live: LiveSessionSimulator,
    rng: R,
}

impl<S: BatteryStore, C: Clock, R: Rng> Phone<S, C, R> {
    pub fn new(battery: BatteryEngine<S, C>, live: LiveSessionSimulator, rng: R) -> Self {
        Self { battery, live, rng }
    }

    pub fn battery(&self) -> &BatteryEngine<S, C> {
        &self.battery
    }

    pub fn live(&self) -> &LiveSessionSimulator {
        &self.live
    }

    /// Advance both simulations by the same amount of time.
    pub fn tick(&mut self, elapsed_ms: i64) -> Vec<PhoneEvent> {
        let mut events: Vec<PhoneEvent> = self
            .battery
            .advance(elapsed_ms)
            .into_iter()
            .map(PhoneEvent::Battery)
            .collect();
        events.extend(
            self.live
                .advance(elapsed_ms, &mut self.rng)
                .into_iter()
                .map(PhoneEvent::Live),
        );
        events
    }

    /// Apply a UI command. Returns false when it changed nothing (unknown
    /// chat, charging an already full battery, and so on).
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Drain { amount } => self.battery.drain(amount.unwrap_or(1.0)) > 0.0,
            Command::StartCharging => self.battery.start_charging(),
            Command::StopCharging => self.battery.stop_charging(),
            Command::InstantCharge => {
                self.battery.instant_charge();
                true
            }
            Command::Reset => {
                self.battery.reset();
                true
            }
            Command::Join { chat_id } => self.live.join_session(&chat_id).is_some(),
            Command::Leave { chat_id } => self.live.leave_session(&chat_id).is_some(),
            Command::React { chat_id, emoji } => self.live.add_reaction(&chat_id, &emoji).is_some(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            now_ms: self.live.now_ms(),
            battery: self.battery.state().clone(),
            sessions: self.live.sessions().cloned().collect(),
            trending: self
                .live
                .trending_chats()
                .into_iter()
                .map(|s| s.chat_id.clone())
                .collect(),
        }
    }
}
