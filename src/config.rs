//! Per-game rule configuration.
//!
//! Reads `FARKLE_MINIMUM_ENTRY_SCORE` and `FARKLE_TARGET_SCORE` when loaded
//! from the environment; anything missing or unparsable keeps the default.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub const DEFAULT_MINIMUM_ENTRY_SCORE: u32 = 500;
pub const DEFAULT_TARGET_SCORE: u32 = 10_000;

pub const MINIMUM_ENTRY_ENV: &str = "FARKLE_MINIMUM_ENTRY_SCORE";
pub const TARGET_SCORE_ENV: &str = "FARKLE_TARGET_SCORE";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    /// Amount a player's first bank must reach before anything counts.
    pub minimum_entry_score: u32,
    /// Banked total that triggers the final round.
    pub target_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { minimum_entry_score: DEFAULT_MINIMUM_ENTRY_SCORE, target_score: DEFAULT_TARGET_SCORE }
    }
}

impl GameConfig {
    pub fn new(minimum_entry_score: u32, target_score: u32) -> EngineResult<Self> {
        let config = Self { minimum_entry_score, target_score };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.target_score == 0 {
            return Err(EngineError::InvalidConfig("target score must be positive".into()));
        }
        if self.minimum_entry_score > self.target_score {
            return Err(EngineError::InvalidConfig(format!(
                "minimum entry score {} exceeds target score {}",
                self.minimum_entry_score, self.target_score
            )));
        }
        Ok(())
    }

    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EngineResult<Self> {
        let read = |key: &str, default: u32| {
            lookup(key).and_then(|s| s.trim().parse().ok()).unwrap_or(default)
        };
        Self::new(
            read(MINIMUM_ENTRY_ENV, DEFAULT_MINIMUM_ENTRY_SCORE),
            read(TARGET_SCORE_ENV, DEFAULT_TARGET_SCORE),
        )
    }
}
