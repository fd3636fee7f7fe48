// Driver timing
pub const TICK_INTERVAL_MS: u64 = 100;

// Battery capacity by tier
pub const STANDARD_MAX_CAPACITY: f64 = 100.0;
pub const PREMIUM_MAX_CAPACITY: f64 = 150.0;

// Natural recovery while the app is closed
pub const STANDARD_RECHARGE_PER_HOUR: f64 = 10.0;
pub const PREMIUM_RECHARGE_PER_HOUR: f64 = 25.0;
pub const MS_PER_HOUR: f64 = 3_600_000.0;

// Drain multipliers (premium drains half as fast)
pub const STANDARD_DRAIN_MULTIPLIER: f64 = 1.0;
pub const PREMIUM_DRAIN_MULTIPLIER: f64 = 0.5;

// Active charging
pub const CHARGE_TICK_MS: i64 = 1_000;
pub const STANDARD_CHARGE_PER_TICK: f64 = 2.0;
pub const PREMIUM_CHARGE_PER_TICK: f64 = 5.0;

// Battery save file
pub const BATTERY_STORAGE_KEY: &str = "battery_state.json";

// Live session seeding
pub const SEED_VIEWERS_MIN: u32 = 50;
pub const SEED_VIEWERS_SPREAD: u32 = 500;
pub const SEED_PEAK_BONUS_MAX: u32 = 200;
pub const HOTNESS_MIN: u8 = 1;
pub const HOTNESS_MAX: u8 = 100;

// Live session cadences
pub const VIEWER_FLUCTUATION_MS: i64 = 3_000;
pub const REACTION_EMISSION_MS: i64 = 4_000;
pub const REACTION_LIFETIME_MS: i64 = 5_000;

// Viewer fluctuation span is hotness / divisor (at least 1)
pub const FLUCTUATION_HOTNESS_DIVISOR: u8 = 20;

// Random reactions
pub const RANDOM_REACTION_CHANCE: f64 = 0.30;
pub const MAX_REACTIONS_PER_SESSION: usize = 50;
pub const REACTION_PALETTE: [&str; 8] = ["🔥", "😱", "💀", "😂", "❤️", "👀", "😭", "🤯"];

// Trending list
pub const TRENDING_LIMIT: usize = 3;

// Story generation
pub const SHORT_STORY_MESSAGES: (u32, u32) = (8, 12);
pub const MEDIUM_STORY_MESSAGES: (u32, u32) = (12, 18);
pub const LONG_STORY_MESSAGES: (u32, u32) = (20, 30);
