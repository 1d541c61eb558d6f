pub mod arithmetic;
pub mod facts;

use std::collections::HashSet;

use rand::Rng;

pub use arithmetic::{ArithmeticGeneratorPool, Operator};
pub use facts::StaticFactPool;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("a question needs at least 2 choices, got {0}")]
    TooFewChoices(usize),
    #[error("correct index {index} is out of range for {len} choices")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

/// A single quiz question: a prompt, its choices and which of them is right.
///
/// Immutable once built. Deserialized questions go through the same validation
/// as [`Question::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    prompt: String,
    choices: Vec<String>,
    correct_index: usize,
}

#[derive(serde::Deserialize)]
struct RawQuestion {
    prompt: String,
    choices: Vec<String>,
    correct_index: usize,
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Question::try_new(raw.prompt, raw.choices, raw.correct_index)
    }
}

impl Question {
    /// Builds a question, panicking if `correct_index` does not point into
    /// `choices` or there are fewer than two choices.
    pub fn new(prompt: impl Into<String>, choices: Vec<String>, correct_index: usize) -> Self {
        match Self::try_new(prompt, choices, correct_index) {
            Ok(question) => question,
            Err(err) => panic!("invalid question: {}", err),
        }
    }

    pub fn try_new(
        prompt: impl Into<String>,
        choices: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        if choices.len() < 2 {
            return Err(QuestionError::TooFewChoices(choices.len()));
        }
        if correct_index >= choices.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                len: choices.len(),
            });
        }
        Ok(Self {
            prompt: prompt.into(),
            choices,
            correct_index,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn correct_answer(&self) -> &str {
        &self.choices[self.correct_index]
    }

    /// Exact, case-sensitive comparison against the correct choice.
    pub fn check_answer(&self, candidate: &str) -> bool {
        candidate == self.correct_answer()
    }
}

/// Source of randomness handed to a pool at construction.
///
/// Every `rand::Rng` is one, so a seeded `StdRng` works for reproducible runs.
pub trait RandomSource {
    /// Uniformly distributed integer in `[low, high)`.
    fn uniform_int(&mut self, low: i64, high: i64) -> i64;
}

impl<R: Rng> RandomSource for R {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        self.gen_range(low..high)
    }
}

/// Fisher-Yates shuffle driven by a [`RandomSource`].
pub fn shuffle<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.uniform_int(0, i as i64 + 1) as usize;
        items.swap(i, j);
    }
}

/// Selection and asked-question bookkeeping shared by every pool.
///
/// Only the pools themselves can change it, so the selected question is always
/// the one `next_question` returned last:
///
/// ```compile_fail
/// use true_false_quiz::quiz::{Question, QuestionPool, StaticFactPool};
///
/// let mut pool = StaticFactPool::new();
/// let forged = Question::new("Fish can fly", vec!["True".into(), "False".into()], 0);
/// pool.state_mut().select(forged);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PoolState {
    selected: Option<Question>,
    asked_prompts: HashSet<String>,
}

impl PoolState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `question` the target of answer checks and marks its prompt as asked.
    pub(crate) fn select(&mut self, question: Question) -> Question {
        self.asked_prompts.insert(question.prompt().to_string());
        self.selected = Some(question.clone());
        question
    }

    pub fn selected(&self) -> Option<&Question> {
        self.selected.as_ref()
    }

    pub fn is_prompt_asked(&self, prompt: &str) -> bool {
        self.asked_prompts.contains(prompt)
    }

    pub fn asked_count(&self) -> usize {
        self.asked_prompts.len()
    }

    pub(crate) fn clear_asked(&mut self) {
        self.asked_prompts.clear();
    }
}

/// A source of questions that remembers which prompts it has already handed out.
///
/// Two questions count as the same when their prompts are equal.
pub trait QuestionPool {
    /// Picks a question that has not been asked yet and makes it the selected one.
    ///
    /// `None` means the pool has nothing new left to offer.
    fn next_question(&mut self) -> Option<Question>;

    fn state(&self) -> &PoolState;

    fn state_mut(&mut self) -> &mut PoolState;

    fn selected_question(&self) -> Option<&Question> {
        self.state().selected()
    }

    /// Checks `candidate` against the most recently selected question.
    ///
    /// # Panics
    /// If no question has been selected yet.
    fn check_answer(&self, candidate: &str) -> bool {
        self.selected_question()
            .expect("check_answer called before any question was selected")
            .check_answer(candidate)
    }

    fn has_been_asked(&self, question: &Question) -> bool {
        self.state().is_prompt_asked(question.prompt())
    }

    /// Forgets every asked prompt. The selected question stays selected.
    fn reset(&mut self) {
        log::debug!("Resetting {} asked questions", self.state().asked_count());
        self.state_mut().clear_asked();
    }
}
