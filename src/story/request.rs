//! Story generation request parsing and validation.

use super::error::ApiError;
use crate::core::constants::{LONG_STORY_MESSAGES, MEDIUM_STORY_MESSAGES, SHORT_STORY_MESSAGES};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl StoryLength {
    pub fn message_range(&self) -> RangeInclusive<u32> {
        let (lo, hi) = match self {
            StoryLength::Short => SHORT_STORY_MESSAGES,
            StoryLength::Medium => MEDIUM_STORY_MESSAGES,
            StoryLength::Long => LONG_STORY_MESSAGES,
        };
        lo..=hi
    }
}

impl FromStr for StoryLength {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(StoryLength::Short),
            "medium" => Ok(StoryLength::Medium),
            "long" => Ok(StoryLength::Long),
            other => Err(ApiError::BadRequest(format!(
                "Invalid length '{}': expected short, medium or long",
                other
            ))),
        }
    }
}

/// Raw request body as sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    pub genre: Option<String>,
    pub story_prompt: Option<String>,
    pub length: Option<String>,
}

/// A request that passed validation. Blank strings are normalized away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStoryRequest {
    pub genre: Option<String>,
    pub story_prompt: Option<String>,
    pub length: StoryLength,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl StoryRequest {
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        serde_json::from_str(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
    }

    pub fn validate(&self) -> Result<ValidatedStoryRequest, ApiError> {
        let genre = non_blank(&self.genre);
        let story_prompt = non_blank(&self.story_prompt);
        if genre.is_none() && story_prompt.is_none() {
            return Err(ApiError::BadRequest(
                "Either genre or storyPrompt is required".to_string(),
            ));
        }

        let length = match non_blank(&self.length) {
            Some(raw) => raw.parse()?,
            None => StoryLength::default(),
        };

        Ok(ValidatedStoryRequest {
            genre,
            story_prompt,
            length,
        })
    }
}

impl ValidatedStoryRequest {
    /// Pick how many messages the generated story should contain.
    pub fn roll_message_count(&self, rng: &mut impl Rng) -> u32 {
        rng.gen_range(self.length.message_range())
    }
}
