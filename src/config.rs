use std::str::FromStr;
use std::time::Duration;

use crate::quiz::{ArithmeticGeneratorPool, QuestionPool, StaticFactPool};

pub const QUESTIONS_PER_ROUND_VAR: &str = "QUIZ_QUESTIONS_PER_ROUND";
pub const TIME_LIMIT_VAR: &str = "QUIZ_TIME_LIMIT_SECS";
pub const MODE_VAR: &str = "QUIZ_MODE";

pub const DEFAULT_QUESTIONS_PER_ROUND: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number, got {value:?}")]
    NotANumber { var: &'static str, value: String },
    #[error("QUIZ_QUESTIONS_PER_ROUND can't be 0")]
    ZeroQuestions,
    #[error("unknown game mode {0:?}, expected \"facts\" or \"arithmetic\"")]
    UnknownMode(String),
}

/// Which kind of questions a round is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Facts,
    Arithmetic,
}

impl GameMode {
    /// A fresh pool for this mode, seeded from the OS.
    pub fn build_pool(&self) -> Box<dyn QuestionPool> {
        match self {
            GameMode::Facts => Box::new(StaticFactPool::new()),
            GameMode::Arithmetic => Box::new(ArithmeticGeneratorPool::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Facts => "facts",
            GameMode::Arithmetic => "arithmetic",
        }
    }
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facts" | "text" | "trivia" => Ok(GameMode::Facts),
            "arithmetic" | "math" => Ok(GameMode::Arithmetic),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    pub questions_per_round: usize,
    /// `None` means answers are never too late.
    pub answer_time_limit: Option<Duration>,
    pub mode: GameMode,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            questions_per_round: DEFAULT_QUESTIONS_PER_ROUND,
            answer_time_limit: None,
            mode: GameMode::default(),
        }
    }
}

impl RoundConfig {
    /// Reads the process environment. Call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source, unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(QUESTIONS_PER_ROUND_VAR) {
            config.questions_per_round = parse_number(QUESTIONS_PER_ROUND_VAR, &value)?;
            if config.questions_per_round == 0 {
                return Err(ConfigError::ZeroQuestions);
            }
        }

        if let Some(value) = lookup(TIME_LIMIT_VAR) {
            let secs = parse_number(TIME_LIMIT_VAR, &value)?;
            config.answer_time_limit = if secs == 0 {
                None
            } else {
                Some(Duration::from_secs(secs))
            };
        }

        if let Some(value) = lookup(MODE_VAR) {
            config.mode = value.parse()?;
        }

        log::debug!("Loaded round config: {:?}", config);
        Ok(config)
    }
}

fn parse_number<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::NotANumber {
            var,
            value: value.to_string(),
        })
}
