//! Core types for the study session engine.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shortened-quiz size offered to learners as a one-click preset.
pub const QUIZ_LIMIT_PRESET: usize = 10;

/// Header label recognised when no labels are configured.
pub const DEFAULT_FRONT_LABEL: &str = "front";

/// One front/back term pair. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub front: String,
    pub back: String,
}

impl Record {
    /// Build a record, trimming both sides.
    pub fn new(front: impl AsRef<str>, back: impl AsRef<str>) -> Self {
        Self {
            front: front.as_ref().trim().to_string(),
            back: back.as_ref().trim().to_string(),
        }
    }

    /// The (front, back) pair as shown under the given orientation.
    pub fn oriented(&self, side_inverted: bool) -> (&str, &str) {
        if side_inverted {
            (&self.back, &self.front)
        } else {
            (&self.front, &self.back)
        }
    }
}

/// What a retry does with the deck order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Draw a fresh permutation on every retry.
    Reshuffle,
    /// Replay the permutation drawn at session start.
    PreserveOrder,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Reshuffle
    }
}

impl RetryPolicy {
    /// Get the policy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reshuffle => "reshuffle",
            Self::PreserveOrder => "preserve_order",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reshuffle" | "reshuffle_on_retry" => Some(Self::Reshuffle),
            "preserve_order" | "preserve" | "preserve_order_on_retry" => Some(Self::PreserveOrder),
            _ => None,
        }
    }

    /// Like [`RetryPolicy::from_str`] but reports the offending value.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Self::from_str(s).ok_or_else(|| ConfigError::InvalidRetryPolicy(s.to_string()))
    }
}

/// Session configuration, applied at session start and at every retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub retry_policy: RetryPolicy,
    pub side_inverted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_size_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_seed: Option<u64>,
    pub front_labels: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retry_policy: RetryPolicy::default(),
            side_inverted: false,
            deck_size_limit: None,
            shuffle_seed: None,
            front_labels: vec![DEFAULT_FRONT_LABEL.to_string()],
        }
    }
}

impl SessionConfig {
    /// Whether `label` names the front column of a header row.
    pub fn is_front_label(&self, label: &str) -> bool {
        let label = label.trim();
        if self.front_labels.is_empty() {
            return label.eq_ignore_ascii_case(DEFAULT_FRONT_LABEL);
        }
        self.front_labels
            .iter()
            .any(|known| known.trim().to_lowercase() == label.to_lowercase())
    }

    /// Parse a deck size limit; empty, `none` and `all` mean unlimited.
    pub fn parse_deck_limit(s: &str) -> Result<Option<usize>, ConfigError> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "" | "none" | "all" => Ok(None),
            "quiz" => Ok(Some(QUIZ_LIMIT_PRESET)),
            _ => s
                .parse::<usize>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidDeckLimit(s.to_string())),
        }
    }
}

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Active,
    Summary,
}

/// Out-of-band message for the render sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// The deck has no cards to study.
    NoCards,
    /// Source text could not be obtained; the deck is empty.
    SourceUnavailable { message: String },
}
