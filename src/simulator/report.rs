//! Simulation report generation.

use serde::Serialize;

/// End-of-run state for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub chat_id: String,
    pub hotness: u8,
    pub final_viewers: u32,
    pub peak_viewers: u32,
    pub live_reactions: usize,
}

/// Results of a single headless run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimReport {
    pub seed: u64,
    pub duration_ms: i64,
    pub is_premium: bool,

    // Battery
    pub final_level: f64,
    pub max_capacity: f64,
    pub min_level: f64,
    pub drains: u64,
    pub deaths: u64,
    pub dead_ms: i64,
    pub charge_sessions: u64,
    pub charge_ticks: u64,
    pub full_charges: u64,

    // Crowd
    pub viewer_changes: u64,
    pub random_reactions: u64,
    pub user_reactions: u64,
    pub expired_reactions: u64,
    pub sessions: Vec<SessionSummary>,
    pub trending: Vec<String>,
}

impl SimReport {
    /// Percentage of the run spent with a dead battery.
    pub fn dead_percent(&self) -> f64 {
        if self.duration_ms <= 0 {
            return 0.0;
        }
        self.dead_ms as f64 / self.duration_ms as f64 * 100.0
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let tier = if self.is_premium { "premium" } else { "standard" };

        out.push_str("━━━ Battery ━━━\n");
        out.push_str(&format!(
            "  Tier:            {} ({:.0} max)\n",
            tier, self.max_capacity
        ));
        out.push_str(&format!(
            "  Final level:     {:.1} (lowest {:.1})\n",
            self.final_level, self.min_level
        ));
        out.push_str(&format!("  Drains:          {}\n", self.drains));
        out.push_str(&format!(
            "  Deaths:          {} ({:.1}% of run dead)\n",
            self.deaths,
            self.dead_percent()
        ));
        out.push_str(&format!(
            "  Charging:        {} sessions, {} ticks, {} full\n",
            self.charge_sessions, self.charge_ticks, self.full_charges
        ));

        out.push_str("\n━━━ Live sessions ━━━\n");
        out.push_str(&format!("  Viewer changes:  {}\n", self.viewer_changes));
        out.push_str(&format!(
            "  Reactions:       {} random, {} from user, {} expired\n",
            self.random_reactions, self.user_reactions, self.expired_reactions
        ));
        out.push_str("\n  Chat      Hot  Viewers   Peak  Live\n");
        for s in &self.sessions {
            out.push_str(&format!(
                "  {:<8} {:>4} {:>8} {:>6} {:>5}\n",
                s.chat_id, s.hotness, s.final_viewers, s.peak_viewers, s.live_reactions
            ));
        }
        out.push_str(&format!("\n  Trending: {}\n", self.trending.join(", ")));
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
