use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::quiz::{PoolState, Question, QuestionPool, RandomSource};

/// (statement, is it true?)
const FACTS: [(&str, bool); 4] = [
    ("Only female koalas can whistle", false),
    ("Blue whales are technically whales", true),
    ("Camels are cannibalistic", false),
    ("All ducks are birds", true),
];

pub const TRUE_ANSWER: &str = "True";
pub const FALSE_ANSWER: &str = "False";

/// A fixed set of true/false trivia questions, each asked once per reset.
pub struct StaticFactPool<R = StdRng> {
    questions: Vec<Question>,
    state: PoolState,
    rng: R,
}

impl StaticFactPool<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for StaticFactPool<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> StaticFactPool<R> {
    pub fn with_rng(rng: R) -> Self {
        let questions = FACTS
            .iter()
            .map(|(statement, is_true)| {
                let choices = vec![TRUE_ANSWER.to_string(), FALSE_ANSWER.to_string()];
                let correct_index = if *is_true { 0 } else { 1 };
                Question::new(*statement, choices, correct_index)
            })
            .collect();
        return Self {
            questions,
            state: PoolState::new(),
            rng,
        };
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl<R: RandomSource> QuestionPool for StaticFactPool<R> {
    fn next_question(&mut self) -> Option<Question> {
        // Without this check the rejection loop below would never end
        if self.state.asked_count() >= self.questions.len() {
            log::debug!("All {} facts have been asked", self.questions.len());
            return None;
        }

        // Keep drawing until we land on a question that hasn't been asked yet
        let question = loop {
            let idx = self.rng.uniform_int(0, self.questions.len() as i64) as usize;
            let candidate = &self.questions[idx];
            if !self.state.is_prompt_asked(candidate.prompt()) {
                break candidate.clone();
            }
            log::trace!("Fact {:?} already asked, drawing again", candidate.prompt());
        };

        log::debug!("Selected fact: {:?}", question.prompt());
        Some(self.state.select(question))
    }

    fn state(&self) -> &PoolState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PoolState {
        &mut self.state
    }
}
