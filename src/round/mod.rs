//! Timed arithmetic round: questions, scoring, lives and the countdown.
//!
//! The engine never touches the DOM. It is driven by three kinds of events
//! (`start_round`, an answer, a clock tick) and talks back through the
//! injected [`FeedbackSink`]. Timer and randomness are injected as well, so
//! a round can be replayed deterministically with a seeded source and a
//! [`ManualClock`].

mod engine;
mod question;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub use engine::{AnswerOutcome, RoundEngine, TickOutcome, parse_answer};
pub use question::generate_question;

// --- Round parameters --------------------------------------------------------

/// Operand range selector. Fixed for the round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(GameError::UnknownDifficulty(other.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }

    /// Exact result of the operation. Division is only ever asked with an
    /// exact quotient, so integer division is lossless here.
    pub fn apply(self, a: i64, b: i64) -> i64 {
        match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => a / b,
        }
    }
}

impl FromStr for Operation {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "multiply" => Ok(Operation::Multiply),
            "divide" => Ok(Operation::Divide),
            other => Err(GameError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --- Question / state --------------------------------------------------------

/// One prompt. Replaced wholesale after every answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Question {
    pub operation: Operation,
    pub operand_a: i64,
    pub operand_b: i64,
    pub expected_answer: i64,
}

impl Question {
    pub fn text(&self) -> String {
        format!(
            "{} {} {} = ?",
            self.operand_a,
            self.operation.symbol(),
            self.operand_b
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    NotStarted,
    Active,
    Ended,
}

/// Counters for a single round. A fresh value is built by every `start_round`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundState {
    pub score: u32,
    pub lives: u32,
    pub time_remaining: u32,
    pub correct_count: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub difficulty: Difficulty,
    pub operation: Operation,
    pub question: Option<Question>,
}

impl RoundState {
    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            final_score: self.score,
            correct_count: self.correct_count,
            best_streak: self.best_streak,
        }
    }
}

/// What the end screen shows and what the host may receive as JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub final_score: u32,
    pub correct_count: u32,
    pub best_streak: u32,
}

// --- Capabilities --------------------------------------------------------------

/// Discrete events pushed to the feedback sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackEvent {
    Correct,
    Incorrect,
    InvalidInput,
    RoundEnded(RoundSummary),
}

/// Consumer of engine events (haptics, particles, HUD). Nothing flows back.
pub trait FeedbackSink {
    fn emit(&mut self, event: FeedbackEvent);
}

impl FeedbackSink for Vec<FeedbackEvent> {
    fn emit(&mut self, event: FeedbackEvent) {
        self.push(event);
    }
}

/// Uniform integer source.
pub trait RandomSource {
    fn next_int(&mut self, min_inclusive: i64, max_inclusive: i64) -> i64;
}

/// One-second tick source. The host calls [`RoundEngine::tick`] while
/// subscribed; the engine subscribes on round start and unsubscribes on end.
pub trait Clock {
    fn subscribe(&mut self);
    fn unsubscribe(&mut self);
}

/// Clock for headless hosts: ticks are delivered by hand, it only records
/// whether the engine currently wants them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    pub subscribed: bool,
    pub subscriptions: u32,
}

impl Clock for ManualClock {
    fn subscribe(&mut self) {
        self.subscribed = true;
        self.subscriptions += 1;
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_names_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(d.name().parse::<Difficulty>(), Ok(d));
        }
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
        }
        assert_eq!(
            "insane".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty("insane".into()))
        );
        assert_eq!(
            "modulo".parse::<Operation>(),
            Err(GameError::UnknownOperation("modulo".into()))
        );
    }

    #[test]
    fn test_question_text() {
        let q = Question {
            operation: Operation::Divide,
            operand_a: 56,
            operand_b: 7,
            expected_answer: 8,
        };
        assert_eq!(q.text(), "56 ÷ 7 = ?");
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = RoundSummary {
            final_score: 120,
            correct_count: 9,
            best_streak: 4,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"final_score":120,"correct_count":9,"best_streak":4}"#);
    }
}
