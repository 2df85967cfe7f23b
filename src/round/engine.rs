use super::{
    Clock, Difficulty, FeedbackEvent, FeedbackSink, Operation, Phase, Question, RandomSource,
    RoundState, RoundSummary, generate_question,
};
use crate::config::RoundConfig;
use crate::error::{GameError, GameResult};

/// Result of a well-formed answer during an active round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Points awarded for this answer, streak bonus included.
    Correct { points: u32 },
    Incorrect { lives_remaining: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running { time_remaining: u32 },
    /// Countdown hit zero and the round ended on this tick.
    Expired,
}

/// Owns the round state and applies the transition rules.
pub struct RoundEngine<R, C, F> {
    config: RoundConfig,
    rng: R,
    clock: C,
    sink: F,
    phase: Phase,
    round: Option<RoundState>,
}

impl<R: RandomSource, C: Clock, F: FeedbackSink> RoundEngine<R, C, F> {
    pub fn new(config: RoundConfig, rng: R, clock: C, sink: F) -> Self {
        Self {
            config,
            rng,
            clock,
            sink,
            phase: Phase::NotStarted,
            round: None,
        }
    }

    /// Begin a fresh round. Any round in progress is dropped on the floor and
    /// its clock subscription released first.
    pub fn start_round(&mut self, difficulty: Difficulty, operation: Operation) {
        if self.phase == Phase::Active {
            log::debug!("discarding active round for restart");
            self.clock.unsubscribe();
        }

        let question = generate_question(&self.config, difficulty, operation, &mut self.rng);
        self.round = Some(RoundState {
            score: 0,
            lives: self.config.starting_lives,
            time_remaining: self.config.round_seconds,
            correct_count: 0,
            current_streak: 0,
            best_streak: 0,
            difficulty,
            operation,
            question: Some(question),
        });
        self.phase = Phase::Active;
        self.clock.subscribe();
        log::info!("round started: {difficulty} {operation}");
    }

    /// Submit the raw answer text. Unreadable text is reported to the sink as
    /// invalid input and changes nothing else.
    pub fn submit_answer(&mut self, input: &str) -> GameResult<AnswerOutcome> {
        if self.phase != Phase::Active {
            return Err(GameError::InactiveRound);
        }
        match parse_answer(input) {
            Some(value) => self.submit_value(value),
            None => {
                log::debug!("rejected answer {input:?}");
                self.sink.emit(FeedbackEvent::InvalidInput);
                Err(GameError::InvalidInput {
                    input: input.to_string(),
                })
            }
        }
    }

    pub fn submit_value(&mut self, value: i64) -> GameResult<AnswerOutcome> {
        if self.phase != Phase::Active {
            return Err(GameError::InactiveRound);
        }
        let round = self.round.as_mut().ok_or(GameError::InactiveRound)?;
        let config = &self.config;
        let correct = round.question.map(|q| q.expected_answer) == Some(value);

        let outcome = if correct {
            round.correct_count += 1;
            round.current_streak += 1;
            round.best_streak = round.best_streak.max(round.current_streak);
            let mut points = config.points_per_correct;
            if round.current_streak >= config.streak_bonus_threshold {
                points = points
                    .saturating_add(config.streak_bonus_per_step.saturating_mul(round.current_streak));
            }
            round.score = round.score.saturating_add(points);
            self.sink.emit(FeedbackEvent::Correct);
            AnswerOutcome::Correct { points }
        } else {
            round.lives = round.lives.saturating_sub(1);
            round.current_streak = 0;
            self.sink.emit(FeedbackEvent::Incorrect);
            AnswerOutcome::Incorrect {
                lives_remaining: round.lives,
            }
        };

        if round.lives == 0 {
            self.finish();
        } else {
            round.question = Some(generate_question(
                config,
                round.difficulty,
                round.operation,
                &mut self.rng,
            ));
        }
        Ok(outcome)
    }

    /// One elapsed second. Ignored outside an active round.
    pub fn tick(&mut self) -> GameResult<TickOutcome> {
        if self.phase != Phase::Active {
            return Err(GameError::InactiveRound);
        }
        let round = self.round.as_mut().ok_or(GameError::InactiveRound)?;
        round.time_remaining = round.time_remaining.saturating_sub(1);
        if round.time_remaining == 0 {
            self.finish();
            return Ok(TickOutcome::Expired);
        }
        Ok(TickOutcome::Running {
            time_remaining: round.time_remaining,
        })
    }

    fn finish(&mut self) {
        self.phase = Phase::Ended;
        self.clock.unsubscribe();
        if let Some(summary) = self.summary() {
            log::info!(
                "round ended: score={} correct={} best_streak={}",
                summary.final_score,
                summary.correct_count,
                summary.best_streak
            );
            self.sink.emit(FeedbackEvent::RoundEnded(summary));
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn question(&self) -> Option<&Question> {
        self.round.as_ref().and_then(|r| r.question.as_ref())
    }

    /// Final numbers, available once the round has ended.
    pub fn summary(&self) -> Option<RoundSummary> {
        match self.phase {
            Phase::Ended => self.round.as_ref().map(RoundState::summary),
            _ => None,
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn feedback(&self) -> &F {
        &self.sink
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Read answer text the way a browser number box is read: leading
/// whitespace, an optional sign, then the leading run of digits. Trailing
/// junk is ignored; no digits at all is `None`.
pub fn parse_answer(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
