use std::fmt;
use std::time::Duration;

use crate::config::{GameMode, RoundConfig};
use crate::quiz::{Question, QuestionPool};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("no question is waiting for an answer")]
    NoActiveQuestion,
    #[error("the current question hasn't been answered yet")]
    AnswerPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub asked: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Way to go!\nYou got {} out of {} correct!",
            self.correct, self.asked
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStep {
    Question(Question),
    Finished(Score),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// The answer came in after the time limit, it counts as wrong.
    TimedOut,
}

/// Runs rounds of a fixed number of questions against a pool and keeps score.
pub struct RoundController {
    pool: Box<dyn QuestionPool>,
    mode: GameMode,
    questions_per_round: usize,
    time_limit: Option<Duration>,
    asked: usize,
    correct: usize,
    awaiting_answer: bool,
}

impl RoundController {
    pub fn new(config: &RoundConfig) -> Self {
        Self::with_pool(config.mode.build_pool(), config)
    }

    /// Uses `pool` instead of building one for `config.mode`.
    pub fn with_pool(pool: Box<dyn QuestionPool>, config: &RoundConfig) -> Self {
        log::info!(
            "Starting {} round of {} questions",
            config.mode.name(),
            config.questions_per_round
        );
        Self {
            pool,
            mode: config.mode,
            questions_per_round: config.questions_per_round,
            time_limit: config.answer_time_limit,
            asked: 0,
            correct: 0,
            awaiting_answer: false,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn score(&self) -> Score {
        Score {
            correct: self.correct,
            asked: self.asked,
        }
    }

    /// The next question, or the final score once the round is over.
    ///
    /// A round ends after `questions_per_round` answers, or earlier if the pool runs dry.
    pub fn next_step(&mut self) -> Result<RoundStep, RoundError> {
        if self.awaiting_answer {
            return Err(RoundError::AnswerPending);
        }

        if self.asked >= self.questions_per_round {
            return Ok(self.finish());
        }

        match self.pool.next_question() {
            Some(question) => {
                self.awaiting_answer = true;
                Ok(RoundStep::Question(question))
            }
            None => {
                log::info!("Question pool exhausted after {} questions", self.asked);
                Ok(self.finish())
            }
        }
    }

    /// Scores `candidate` against the current question.
    ///
    /// `elapsed` is how long the player took, measured by the caller.
    pub fn submit_answer(
        &mut self,
        candidate: &str,
        elapsed: Duration,
    ) -> Result<Verdict, RoundError> {
        if !self.awaiting_answer {
            return Err(RoundError::NoActiveQuestion);
        }
        self.awaiting_answer = false;
        self.asked += 1;

        let verdict = match self.time_limit {
            Some(limit) if elapsed > limit => Verdict::TimedOut,
            _ if self.pool.check_answer(candidate) => Verdict::Correct,
            _ => Verdict::Incorrect,
        };
        if verdict == Verdict::Correct {
            self.correct += 1;
        }

        log::debug!("Answer {:?} judged {:?}", candidate, verdict);
        Ok(verdict)
    }

    /// The question currently waiting for an answer.
    pub fn current_question(&self) -> Option<&Question> {
        if self.awaiting_answer {
            self.pool.selected_question()
        } else {
            None
        }
    }

    /// Starts over with the same pool, letting already asked questions come back.
    pub fn play_again(&mut self) {
        self.reset_stats();
        self.pool.reset();
        log::info!("Replaying {} round", self.mode.name());
    }

    /// Throws the current pool away and starts a round with a fresh one.
    pub fn switch_mode(&mut self, mode: GameMode) {
        self.switch_pool(mode, mode.build_pool());
    }

    pub fn switch_pool(&mut self, mode: GameMode, pool: Box<dyn QuestionPool>) {
        self.reset_stats();
        self.pool = pool;
        self.mode = mode;
        log::info!("Switched to {} mode", mode.name());
    }

    fn reset_stats(&mut self) {
        self.asked = 0;
        self.correct = 0;
        self.awaiting_answer = false;
    }

    fn finish(&self) -> RoundStep {
        let score = self.score();
        log::info!("Round finished: {}/{} correct", score.correct, score.asked);
        RoundStep::Finished(score)
    }
}
