//! Real-time driver: ticks a shared [`Phone`] on a tokio interval and
//! broadcasts JSON snapshots whenever something changes.

use crate::battery::BatteryStore;
use crate::core::clock::SystemClock;
use crate::core::constants::TICK_INTERVAL_MS;
use crate::phone::{Command, Phone};
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// The phone as run by the server: any store, wall-clock time, OS-seeded rng.
pub type LivePhone = Phone<Box<dyn BatteryStore + Send>, SystemClock, StdRng>;

pub type SharedPhone = Arc<Mutex<LivePhone>>;

/// Channel for JSON snapshots sent to every subscriber
pub type SnapshotSender = broadcast::Sender<String>;

/// Owns the tick task. Dropping the handle stops the timers.
pub struct DriverHandle {
    phone: SharedPhone,
    snapshots: SnapshotSender,
    task: JoinHandle<()>,
}

impl DriverHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.snapshots.subscribe()
    }

    pub fn phone(&self) -> SharedPhone {
        Arc::clone(&self.phone)
    }

    /// Current state as JSON.
    pub async fn snapshot_json(&self) -> Option<String> {
        let phone = self.phone.lock().await;
        encode_snapshot(&phone)
    }

    /// Apply a command and push the resulting snapshot to subscribers.
    pub async fn apply(&self, command: Command) -> bool {
        let (changed, json) = {
            let mut phone = self.phone.lock().await;
            let changed = phone.apply(command);
            (changed, encode_snapshot(&phone))
        };
        if changed {
            if let Some(json) = json {
                // No subscribers is fine
                let _ = self.snapshots.send(json);
            }
        }
        changed
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn encode_snapshot(phone: &LivePhone) -> Option<String> {
    match serde_json::to_string(&phone.snapshot()) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("Could not encode snapshot: {}", e);
            None
        }
    }
}

/// Start ticking `phone` every 100ms. Must be called inside a tokio runtime.
pub fn spawn_driver(phone: LivePhone) -> DriverHandle {
    let phone = Arc::new(Mutex::new(phone));
    let (snapshots, _) = broadcast::channel(64);

    let task = tokio::spawn(run_ticks(Arc::clone(&phone), snapshots.clone()));

    DriverHandle {
        phone,
        snapshots,
        task,
    }
}

async fn run_ticks(phone: SharedPhone, snapshots: SnapshotSender) {
    let mut interval = time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    loop {
        interval.tick().await;

        // Whole milliseconds only; the remainder carries into the next tick
        let elapsed_ms = last.elapsed().as_millis() as u64;
        if elapsed_ms == 0 {
            continue;
        }
        last += Duration::from_millis(elapsed_ms);

        let json = {
            let mut phone = phone.lock().await;
            let events = phone.tick(elapsed_ms as i64);
            if events.is_empty() {
                None
            } else {
                debug!("Tick produced {} events", events.len());
                encode_snapshot(&phone)
            }
        };

        if let Some(json) = json {
            let _ = snapshots.send(json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::{BatteryEngine, MemoryStore};
    use crate::live::LiveSessionSimulator;
    use rand::SeedableRng;

    fn test_phone() -> LivePhone {
        let mut rng = StdRng::seed_from_u64(3);
        let live = LiveSessionSimulator::initialize(["1", "2"], 0, &mut rng);
        let store: Box<dyn BatteryStore + Send> = Box::new(MemoryStore::new());
        let battery = BatteryEngine::initialize(store, SystemClock, false);
        Phone::new(battery, live, rng)
    }

    #[tokio::test]
    async fn test_apply_broadcasts_snapshot() {
        let driver = spawn_driver(test_phone());
        let mut rx = driver.subscribe();

        assert!(driver.apply(Command::Drain { amount: Some(5.0) }).await);
        let json = rx.recv().await.expect("snapshot");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["battery"]["level"], 95.0);
    }

    #[tokio::test]
    async fn test_noop_command_reports_false() {
        let driver = spawn_driver(test_phone());
        assert!(!driver.apply(Command::Join { chat_id: "nope".into() }).await);
        assert!(driver.is_running());
    }

    #[tokio::test]
    async fn test_drop_stops_task() {
        let driver = spawn_driver(test_phone());
        let phone = driver.phone();
        drop(driver);
        tokio::task::yield_now().await;
        // Only our clone is left once the aborted task releases its Arc
        for _ in 0..50 {
            if Arc::strong_count(&phone) == 1 {
                return;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        panic!("tick task still holds the phone after the handle was dropped");
    }
}
