//! Owner of all live sessions plus the timers that animate them.
//!
//! The simulator keeps its own clock. `advance` walks that clock forward and
//! processes every due timer in time order: reaction expiries, the 3-second
//! viewer fluctuation and the 4-second random reaction roll.

use super::logic::{
    assign_trending_ranks, fluctuate_viewers, new_reaction, push_reaction, rank_trending,
    remove_reaction, roll_random_reaction, seed_session,
};
use super::types::{LiveEvent, LiveSession, Reaction};
use crate::core::constants::{REACTION_EMISSION_MS, REACTION_LIFETIME_MS, VIEWER_FLUCTUATION_MS};
use crate::core::timing::{Cadence, ExpiryQueue};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LiveSessionSimulator {
    sessions: BTreeMap<String, LiveSession>,
    now_ms: i64,
    fluctuation: Cadence,
    emission: Cadence,
    expiries: ExpiryQueue<(String, Uuid)>,
}

/// Which timer fires next inside `advance`.
enum Due {
    Expiry,
    Fluctuation,
    Emission,
}

impl LiveSessionSimulator {
    /// An empty simulator whose clock starts at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            sessions: BTreeMap::new(),
            now_ms,
            fluctuation: Cadence::starting_at(VIEWER_FLUCTUATION_MS, now_ms),
            emission: Cadence::starting_at(REACTION_EMISSION_MS, now_ms),
            expiries: ExpiryQueue::new(),
        }
    }

    /// Seed one session per chat id. Repeated ids are seeded once.
    pub fn initialize<I, S>(chat_ids: I, now_ms: i64, rng: &mut impl Rng) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sim = Self::new(now_ms);
        for chat_id in chat_ids {
            let chat_id = chat_id.as_ref();
            if !sim.sessions.contains_key(chat_id) {
                let session = seed_session(chat_id, rng);
                sim.sessions.insert(chat_id.to_string(), session);
            }
        }
        assign_trending_ranks(sim.sessions.values_mut());
        debug!("Seeded {} live sessions", sim.sessions.len());
        sim
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn session(&self, chat_id: &str) -> Option<&LiveSession> {
        self.sessions.get(chat_id)
    }

    /// All sessions in chat id order.
    pub fn sessions(&self) -> impl Iterator<Item = &LiveSession> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Reaction removals still scheduled, including ones already evicted.
    pub fn pending_expiries(&self) -> usize {
        self.expiries.len()
    }

    /// The user started watching. Returns the new count, `None` if unknown.
    pub fn join_session(&mut self, chat_id: &str) -> Option<u32> {
        let Some(session) = self.sessions.get_mut(chat_id) else {
            debug!("join_session: unknown chat {}", chat_id);
            return None;
        };
        session.set_viewers(session.viewer_count.saturating_add(1));
        Some(session.viewer_count)
    }

    pub fn leave_session(&mut self, chat_id: &str) -> Option<u32> {
        let Some(session) = self.sessions.get_mut(chat_id) else {
            debug!("leave_session: unknown chat {}", chat_id);
            return None;
        };
        session.set_viewers(session.viewer_count.saturating_sub(1));
        Some(session.viewer_count)
    }

    /// A reaction from the watching user. Expires 5 seconds after now.
    pub fn add_reaction(&mut self, chat_id: &str, emoji: &str) -> Option<Uuid> {
        self.insert_reaction(chat_id, emoji, false).map(|r| r.id)
    }

    /// The three hottest sessions. Pure query.
    pub fn trending_chats(&self) -> Vec<&LiveSession> {
        rank_trending(self.sessions.values())
    }

    /// Move the clock forward, firing every timer that falls due on the way.
    pub fn advance(&mut self, elapsed_ms: i64, rng: &mut impl Rng) -> Vec<LiveEvent> {
        let mut events = Vec::new();
        if elapsed_ms <= 0 {
            return events;
        }
        let target = self.now_ms.saturating_add(elapsed_ms);

        while let Some((at, due)) = self.next_due(target) {
            self.now_ms = self.now_ms.max(at);
            match due {
                Due::Expiry => self.expire_one(&mut events),
                Due::Fluctuation => {
                    self.fluctuation.fire();
                    self.fluctuate_all(rng, &mut events);
                }
                Due::Emission => {
                    self.emission.fire();
                    self.emit_random(rng, &mut events);
                }
            }
        }

        self.now_ms = target;
        events
    }

    /// Earliest timer at or before `target`. Expiries win ties so a reaction
    /// never outlives its 5 seconds because a tick landed on the same instant.
    fn next_due(&self, target: i64) -> Option<(i64, Due)> {
        let mut best = (self.fluctuation.next_due_ms(), Due::Fluctuation);
        if self.emission.next_due_ms() < best.0 {
            best = (self.emission.next_due_ms(), Due::Emission);
        }
        if let Some(deadline) = self.expiries.next_deadline() {
            if deadline <= best.0 {
                best = (deadline, Due::Expiry);
            }
        }
        if best.0 <= target {
            Some(best)
        } else {
            None
        }
    }

    fn expire_one(&mut self, events: &mut Vec<LiveEvent>) {
        let Some((_, (chat_id, reaction_id))) = self.expiries.pop_due(self.now_ms) else {
            return;
        };
        // Already evicted by the cap, or the session is gone
        let removed = self
            .sessions
            .get_mut(&chat_id)
            .map(|session| remove_reaction(session, reaction_id))
            .unwrap_or(false);
        if removed {
            events.push(LiveEvent::ReactionExpired {
                chat_id,
                reaction_id,
            });
        }
    }

    fn fluctuate_all(&mut self, rng: &mut impl Rng, events: &mut Vec<LiveEvent>) {
        for session in self.sessions.values_mut() {
            if fluctuate_viewers(session, rng) {
                events.push(LiveEvent::ViewersChanged {
                    chat_id: session.chat_id.clone(),
                    viewer_count: session.viewer_count,
                    peak_viewers: session.peak_viewers,
                });
            }
        }
    }

    fn emit_random(&mut self, rng: &mut impl Rng, events: &mut Vec<LiveEvent>) {
        let chat_ids: Vec<&str> = self.sessions.keys().map(String::as_str).collect();
        let Some(roll) = roll_random_reaction(&chat_ids, rng) else {
            return;
        };
        if let Some(reaction) = self.insert_reaction(&roll.chat_id, roll.emoji, roll.anonymous) {
            events.push(LiveEvent::ReactionAdded {
                chat_id: roll.chat_id,
                reaction,
            });
        }
    }

    fn insert_reaction(&mut self, chat_id: &str, emoji: &str, anonymous: bool) -> Option<Reaction> {
        let Some(session) = self.sessions.get_mut(chat_id) else {
            debug!("add_reaction: unknown chat {}", chat_id);
            return None;
        };
        let reaction = new_reaction(emoji, self.now_ms, anonymous);
        let evicted = push_reaction(session, reaction.clone());
        if !evicted.is_empty() {
            debug!("Evicted {} old reactions from {}", evicted.len(), chat_id);
        }
        self.expiries.schedule(
            self.now_ms.saturating_add(REACTION_LIFETIME_MS),
            (chat_id.to_string(), reaction.id),
        );
        Some(reaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn seeded(ids: &[&str]) -> (LiveSessionSimulator, ChaCha8Rng) {
        let mut rng = test_rng();
        let sim = LiveSessionSimulator::initialize(ids.iter().copied(), 0, &mut rng);
        (sim, rng)
    }

    #[test]
    fn test_initialize_seeds_each_id_once() {
        let (sim, _) = seeded(&["1", "2", "2", "3"]);
        assert_eq!(sim.len(), 3);
        for session in sim.sessions() {
            assert!(session.viewer_count >= 1);
            assert!(session.peak_viewers >= session.viewer_count);
            assert!(session.reactions.is_empty());
        }
    }

    #[test]
    fn test_initialize_assigns_trending_ranks() {
        let (sim, _) = seeded(&["1", "2", "3", "4", "5"]);
        let ranked = sim.sessions().filter(|s| s.trending_rank.is_some()).count();
        assert_eq!(ranked, 3);
        let top = sim.trending_chats();
        assert_eq!(top[0].trending_rank, Some(1));
    }

    #[test]
    fn test_add_reaction_then_expire_after_five_seconds() {
        let (mut sim, mut rng) = seeded(&["1"]);
        let id = sim.add_reaction("1", "🔥").expect("known chat");
        assert_eq!(sim.session("1").unwrap().reactions.len(), 1);
        assert!(!sim.session("1").unwrap().reactions[0].anonymous);

        let events = sim.advance(4_999, &mut rng);
        assert!(sim.session("1").unwrap().reactions.iter().any(|r| r.id == id));
        assert!(!events
            .iter()
            .any(|e| matches!(e, LiveEvent::ReactionExpired { reaction_id, .. } if *reaction_id == id)));

        let events = sim.advance(1, &mut rng);
        assert!(!sim.session("1").unwrap().reactions.iter().any(|r| r.id == id));
        assert!(events
            .iter()
            .any(|e| matches!(e, LiveEvent::ReactionExpired { reaction_id, .. } if *reaction_id == id)));
    }

    #[test]
    fn test_unknown_chat_is_noop() {
        let (mut sim, _) = seeded(&["1"]);
        let before = sim.sessions().cloned().collect::<Vec<_>>();
        assert_eq!(sim.join_session("nope"), None);
        assert_eq!(sim.leave_session("nope"), None);
        assert_eq!(sim.add_reaction("nope", "🔥"), None);
        assert_eq!(sim.sessions().cloned().collect::<Vec<_>>(), before);
        assert_eq!(sim.pending_expiries(), 0);
    }

    #[test]
    fn test_join_and_leave() {
        let (mut sim, _) = seeded(&["1"]);
        let start = sim.session("1").unwrap().viewer_count;
        assert_eq!(sim.join_session("1"), Some(start + 1));
        assert_eq!(sim.leave_session("1"), Some(start));
    }

    #[test]
    fn test_leave_floors_at_one() {
        let mut sim = LiveSessionSimulator::new(0);
        sim.sessions
            .insert("x".to_string(), LiveSession::new("x", 1, 10));
        assert_eq!(sim.leave_session("x"), Some(1));
    }

    #[test]
    fn test_advance_moves_clock() {
        let (mut sim, mut rng) = seeded(&["1"]);
        sim.advance(2_500, &mut rng);
        assert_eq!(sim.now_ms(), 2_500);
        sim.advance(0, &mut rng);
        sim.advance(-10, &mut rng);
        assert_eq!(sim.now_ms(), 2_500);
    }

    #[test]
    fn test_reaction_timestamp_uses_simulated_time() {
        let (mut sim, mut rng) = seeded(&["1"]);
        sim.advance(1_234, &mut rng);
        sim.add_reaction("1", "👀");
        let reaction = sim.session("1").unwrap().reactions.last().cloned().unwrap();
        assert_eq!(reaction.timestamp, 1_234);
    }

    #[test]
    fn test_evicted_reaction_expiry_is_harmless() {
        let (mut sim, mut rng) = seeded(&["1"]);
        let ids: Vec<Uuid> = (0..55)
            .filter_map(|_| sim.add_reaction("1", "😂"))
            .collect();
        assert_eq!(sim.session("1").unwrap().reactions.len(), 50);
        assert_eq!(sim.pending_expiries(), 55);

        let events = sim.advance(5_000, &mut rng);
        let expired = events
            .iter()
            .filter(|e| {
                matches!(e, LiveEvent::ReactionExpired { reaction_id, .. } if ids.contains(reaction_id))
            })
            .count();
        assert_eq!(expired, 50);
        assert!(!sim
            .session("1")
            .unwrap()
            .reactions
            .iter()
            .any(|r| ids.contains(&r.id)));
    }
}
