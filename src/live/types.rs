//! Live session data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A short-lived emoji event shown over a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: Uuid,
    pub emoji: String,
    /// Simulated epoch milliseconds at creation.
    pub timestamp: i64,
    pub anonymous: bool,
}

/// Simulated audience for one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSession {
    pub chat_id: String,
    /// Always at least 1.
    pub viewer_count: u32,
    /// Highest viewer count seen. Never decreases.
    pub peak_viewers: u32,
    /// Most recent reactions, oldest first.
    pub reactions: Vec<Reaction>,
    pub is_live: bool,
    /// Popularity score, 1..=100.
    pub hotness: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trending_rank: Option<u32>,
}

impl LiveSession {
    pub fn new(chat_id: impl Into<String>, viewer_count: u32, hotness: u8) -> Self {
        let viewer_count = viewer_count.max(1);
        Self {
            chat_id: chat_id.into(),
            viewer_count,
            peak_viewers: viewer_count,
            reactions: Vec::new(),
            is_live: true,
            hotness: hotness.clamp(1, 100),
            trending_rank: None,
        }
    }

    /// Set the viewer count, keeping the floor of 1 and the peak current.
    pub fn set_viewers(&mut self, count: u32) {
        self.viewer_count = count.max(1);
        self.peak_viewers = self.peak_viewers.max(self.viewer_count);
    }
}

/// Something observable that happened while advancing the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    ViewersChanged {
        chat_id: String,
        viewer_count: u32,
        peak_viewers: u32,
    },
    ReactionAdded {
        chat_id: String,
        reaction: Reaction,
    },
    ReactionExpired {
        chat_id: String,
        reaction_id: Uuid,
    },
}
