//! Round tuning knobs.
//!
//! Defaults reproduce the shipped game exactly: three lives, a sixty second
//! round, ten points a hit and a growing bonus from the third hit in a row.
//! Hosts may override any of it with a JSON blob (missing keys keep their
//! default), e.g. `{"round_seconds": 90, "bounds": {"hard": 200}}`.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::round::Difficulty;

/// Largest operand bound or times table accepted from a host override. Keeps
/// every generated sum and product well inside `i64`.
pub const MAX_OPERAND: i64 = 1_000_000;

/// Inclusive upper bound for add/subtract operands per difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyBounds {
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
}

impl Default for DifficultyBounds {
    fn default() -> Self {
        Self {
            easy: 10,
            medium: 50,
            hard: 100,
        }
    }
}

impl DifficultyBounds {
    pub fn for_difficulty(&self, difficulty: Difficulty) -> i64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub starting_lives: u32,
    pub round_seconds: u32,
    pub points_per_correct: u32,
    /// Streak length from which the bonus kicks in.
    pub streak_bonus_threshold: u32,
    /// Bonus points per streak step, paid on every hit at or past the threshold.
    pub streak_bonus_per_step: u32,
    pub bounds: DifficultyBounds,
    /// Multiply and divide draw from `1..=table_max` regardless of difficulty.
    pub table_max: i64,
    /// Forward the round summary to the Telegram host via `sendData`.
    pub report_summary: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            round_seconds: 60,
            points_per_correct: 10,
            streak_bonus_threshold: 3,
            streak_bonus_per_step: 5,
            bounds: DifficultyBounds::default(),
            table_max: 12,
            report_summary: false,
        }
    }
}

impl RoundConfig {
    /// Parse and validate a JSON override.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.starting_lives == 0 {
            return Err(GameError::Config("starting_lives must be at least 1".into()));
        }
        if self.round_seconds == 0 {
            return Err(GameError::Config("round_seconds must be at least 1".into()));
        }
        for (name, value) in [
            ("table_max", self.table_max),
            ("bounds.easy", self.bounds.easy),
            ("bounds.medium", self.bounds.medium),
            ("bounds.hard", self.bounds.hard),
        ] {
            if !(1..=MAX_OPERAND).contains(&value) {
                return Err(GameError::Config(format!(
                    "{name} must be within 1..={MAX_OPERAND}, got {value}"
                )));
            }
        }
        Ok(())
    }
}
