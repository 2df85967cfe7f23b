//! Error types shared by the round engine, the config loader and the pickers.

use thiserror::Error;

/// Everything the game can refuse to do. None of these abort a round.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Answer text could not be read as an integer.
    #[error("invalid input: {input:?} is not an integer")]
    InvalidInput {
        /// The raw text the player submitted.
        input: String,
    },

    /// An answer or tick arrived while no round was active.
    #[error("no active round")]
    InactiveRound,

    /// `data-level` value the picker does not know.
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// `data-op` value the picker does not know.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Rejected or malformed configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
