//! Pure simulation steps for live sessions. Randomness always comes in as a
//! parameter so seeded runs are reproducible.

use super::types::{LiveSession, Reaction};
use crate::core::constants::*;
use rand::Rng;
use std::cmp::Ordering;
use uuid::Uuid;

/// Outcome of a random-reaction roll that decided to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRoll {
    pub chat_id: String,
    pub emoji: &'static str,
    pub anonymous: bool,
}

/// A freshly seeded session with randomized audience and hotness.
pub fn seed_session(chat_id: &str, rng: &mut impl Rng) -> LiveSession {
    let viewers = SEED_VIEWERS_MIN + rng.gen_range(0..SEED_VIEWERS_SPREAD);
    let hotness = rng.gen_range(HOTNESS_MIN..=HOTNESS_MAX);
    let mut session = LiveSession::new(chat_id, viewers, hotness);
    session.peak_viewers = viewers + rng.gen_range(0..SEED_PEAK_BONUS_MAX);
    session
}

/// Largest single-step change in viewers for a given hotness.
pub fn fluctuation_span(hotness: u8) -> i64 {
    i64::from(hotness / FLUCTUATION_HOTNESS_DIVISOR).max(1)
}

/// One fluctuation step. Returns true if the count moved.
pub fn fluctuate_viewers(session: &mut LiveSession, rng: &mut impl Rng) -> bool {
    let span = fluctuation_span(session.hotness);
    let delta = rng.gen_range(-span..=span);
    let before = session.viewer_count;
    let next = (i64::from(before) + delta).clamp(1, i64::from(u32::MAX));
    session.set_viewers(next as u32);
    session.viewer_count != before
}

/// Choose a session uniformly, then emit with fixed probability.
pub fn roll_random_reaction(chat_ids: &[&str], rng: &mut impl Rng) -> Option<ReactionRoll> {
    if chat_ids.is_empty() {
        return None;
    }
    let chat_id = chat_ids[rng.gen_range(0..chat_ids.len())];
    if rng.gen::<f64>() >= RANDOM_REACTION_CHANCE {
        return None;
    }
    let emoji = REACTION_PALETTE[rng.gen_range(0..REACTION_PALETTE.len())];
    Some(ReactionRoll {
        chat_id: chat_id.to_string(),
        emoji,
        anonymous: rng.gen_bool(0.5),
    })
}

pub fn new_reaction(emoji: &str, timestamp: i64, anonymous: bool) -> Reaction {
    Reaction {
        id: Uuid::new_v4(),
        emoji: emoji.to_string(),
        timestamp,
        anonymous,
    }
}

/// Append a reaction, evicting the oldest past the cap. Returns the evicted
/// reactions, oldest first.
pub fn push_reaction(session: &mut LiveSession, reaction: Reaction) -> Vec<Reaction> {
    session.reactions.push(reaction);
    let overflow = session
        .reactions
        .len()
        .saturating_sub(MAX_REACTIONS_PER_SESSION);
    session.reactions.drain(..overflow).collect()
}

/// Remove exactly the reaction with `id`. False if it is already gone.
pub fn remove_reaction(session: &mut LiveSession, id: Uuid) -> bool {
    match session.reactions.iter().position(|r| r.id == id) {
        Some(index) => {
            session.reactions.remove(index);
            true
        }
        None => false,
    }
}

fn by_hotness(a: &LiveSession, b: &LiveSession) -> Ordering {
    b.hotness
        .cmp(&a.hotness)
        .then_with(|| a.chat_id.cmp(&b.chat_id))
}

/// Hottest sessions first, ties broken by chat id, at most three.
pub fn rank_trending<'a>(sessions: impl IntoIterator<Item = &'a LiveSession>) -> Vec<&'a LiveSession> {
    let mut ranked: Vec<&LiveSession> = sessions.into_iter().collect();
    ranked.sort_by(|a, b| by_hotness(a, b));
    ranked.truncate(TRENDING_LIMIT);
    ranked
}

/// Stamp `trending_rank` 1..=3 on the hottest sessions and clear the rest.
pub fn assign_trending_ranks<'a>(sessions: impl IntoIterator<Item = &'a mut LiveSession>) {
    let mut all: Vec<&mut LiveSession> = sessions.into_iter().collect();
    all.sort_by(|a, b| by_hotness(a, b));
    for (index, session) in all.into_iter().enumerate() {
        session.trending_rank = if index < TRENDING_LIMIT {
            Some(index as u32 + 1)
        } else {
            None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    #[test]
    fn test_seed_session_ranges() {
        let mut rng = test_rng();
        for i in 0..200 {
            let session = seed_session(&i.to_string(), &mut rng);
            assert!((50..550).contains(&session.viewer_count));
            assert!(session.peak_viewers >= session.viewer_count);
            assert!(session.peak_viewers < session.viewer_count + 200);
            assert!((1..=100).contains(&session.hotness));
            assert!(session.reactions.is_empty());
            assert!(session.is_live);
        }
    }

    #[test]
    fn test_fluctuation_span_scales_with_hotness() {
        assert_eq!(fluctuation_span(1), 1);
        assert_eq!(fluctuation_span(39), 1);
        assert_eq!(fluctuation_span(40), 2);
        assert_eq!(fluctuation_span(100), 5);
    }

    #[test]
    fn test_fluctuation_bounded_by_span() {
        let mut rng = test_rng();
        let mut session = LiveSession::new("1", 300, 100);
        for _ in 0..500 {
            let before = i64::from(session.viewer_count);
            fluctuate_viewers(&mut session, &mut rng);
            let delta = i64::from(session.viewer_count) - before;
            assert!(delta.abs() <= 5, "delta {} exceeds span", delta);
        }
    }

    #[test]
    fn test_fluctuation_floors_at_one() {
        let mut rng = test_rng();
        let mut session = LiveSession::new("1", 1, 100);
        for _ in 0..500 {
            fluctuate_viewers(&mut session, &mut rng);
            assert!(session.viewer_count >= 1);
        }
    }

    #[test]
    fn test_peak_never_decreases_under_fluctuation() {
        let mut rng = test_rng();
        let mut session = LiveSession::new("1", 5, 100);
        let mut last_peak = session.peak_viewers;
        for _ in 0..1_000 {
            fluctuate_viewers(&mut session, &mut rng);
            assert!(session.peak_viewers >= last_peak);
            assert!(session.peak_viewers >= session.viewer_count);
            last_peak = session.peak_viewers;
        }
    }

    #[test]
    fn test_random_reaction_rate_near_thirty_percent() {
        let mut rng = test_rng();
        let ids = ["a", "b", "c"];
        let trials = 10_000;
        let hits = (0..trials)
            .filter(|_| roll_random_reaction(&ids, &mut rng).is_some())
            .count();
        let rate = hits as f64 / trials as f64;
        assert!((0.27..0.33).contains(&rate), "rate was {}", rate);
    }

    #[test]
    fn test_random_reaction_uses_palette_and_known_ids() {
        let mut rng = test_rng();
        let ids = ["a", "b"];
        for _ in 0..1_000 {
            if let Some(roll) = roll_random_reaction(&ids, &mut rng) {
                assert!(REACTION_PALETTE.contains(&roll.emoji));
                assert!(ids.contains(&roll.chat_id.as_str()));
            }
        }
    }

    #[test]
    fn test_random_reaction_without_sessions() {
        let mut rng = test_rng();
        assert_eq!(roll_random_reaction(&[], &mut rng), None);
    }

    #[test]
    fn test_push_reaction_caps_at_fifty_oldest_first() {
        let mut session = LiveSession::new("1", 10, 10);
        let mut first_ids = Vec::new();
        for t in 0..52 {
            let reaction = new_reaction("🔥", t, true);
            if t < 2 {
                first_ids.push(reaction.id);
            }
            let evicted = push_reaction(&mut session, reaction);
            assert!(session.reactions.len() <= 50);
            if t >= 50 {
                assert_eq!(evicted.len(), 1);
                assert_eq!(evicted[0].id, first_ids[(t - 50) as usize]);
            } else {
                assert!(evicted.is_empty());
            }
        }
        assert_eq!(session.reactions.first().map(|r| r.timestamp), Some(2));
        assert_eq!(session.reactions.last().map(|r| r.timestamp), Some(51));
    }

    #[test]
    fn test_remove_reaction_only_touches_target() {
        let mut session = LiveSession::new("1", 10, 10);
        let keep = new_reaction("😱", 0, false);
        let gone = new_reaction("💀", 1, false);
        let gone_id = gone.id;
        push_reaction(&mut session, keep.clone());
        push_reaction(&mut session, gone);

        assert!(remove_reaction(&mut session, gone_id));
        assert_eq!(session.reactions, vec![keep]);
        assert!(!remove_reaction(&mut session, gone_id));
    }

    #[test]
    fn test_rank_trending_top_three_by_hotness() {
        let sessions = vec![
            LiveSession::new("a", 10, 20),
            LiveSession::new("b", 10, 90),
            LiveSession::new("c", 10, 55),
            LiveSession::new("d", 10, 90),
            LiveSession::new("e", 10, 5),
        ];
        let ranked: Vec<&str> = rank_trending(&sessions)
            .into_iter()
            .map(|s| s.chat_id.as_str())
            .collect();
        assert_eq!(ranked, vec!["b", "d", "c"]);
    }

    #[test]
    fn test_assign_trending_ranks() {
        let mut sessions = vec![
            LiveSession::new("a", 10, 20),
            LiveSession::new("b", 10, 90),
            LiveSession::new("c", 10, 55),
            LiveSession::new("d", 10, 70),
        ];
        assign_trending_ranks(sessions.iter_mut());
        let ranks: Vec<Option<u32>> = sessions.iter().map(|s| s.trending_rank).collect();
        assert_eq!(ranks, vec![None, Some(1), Some(3), Some(2)]);
    }
}
