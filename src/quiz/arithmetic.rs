use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::quiz::{self, PoolState, Question, QuestionPool, RandomSource};

/// Operands are drawn from `[0, OPERAND_LIMIT)`.
pub const OPERAND_LIMIT: i64 = 100;
/// Distractors are drawn from `[solution - DISTRACTOR_SPREAD, solution + DISTRACTOR_SPREAD]`.
pub const DISTRACTOR_SPREAD: i64 = 10;
/// Every question has either 3 or 4 choices.
pub const MIN_CHOICES: usize = 3;
pub const MAX_CHOICES: usize = 4;

/// Number of distinct prompts the generator can ever render.
pub const PROMPT_SPACE: usize = (OPERAND_LIMIT * OPERAND_LIMIT) as usize * Operator::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
}

impl Operator {
    pub const ALL: [Operator; 3] = [Operator::Add, Operator::Sub, Operator::Mul];

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
        }
    }

    pub fn apply(&self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Renders the prompt text, which doubles as the dedup key.
pub fn render_prompt(lhs: i64, op: Operator, rhs: i64) -> String {
    format!("{} {} {} =", lhs, op, rhs)
}

/// An endless supply of `a <op> b =` questions with nearby-number distractors.
///
/// A prompt is never generated twice until [`QuestionPool::reset`] is called.
pub struct ArithmeticGeneratorPool<R = StdRng> {
    state: PoolState,
    rng: R,
}

impl ArithmeticGeneratorPool<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for ArithmeticGeneratorPool<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> ArithmeticGeneratorPool<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: PoolState::new(),
            rng,
        }
    }

    /// Draws operands and an operator until the rendered prompt is a new one.
    fn draw_expression(&mut self) -> (String, i64) {
        loop {
            let lhs = self.rng.uniform_int(0, OPERAND_LIMIT);
            let rhs = self.rng.uniform_int(0, OPERAND_LIMIT);
            let op = Operator::ALL[self.rng.uniform_int(0, Operator::ALL.len() as i64) as usize];

            let prompt = render_prompt(lhs, op, rhs);
            if !self.state.is_prompt_asked(&prompt) {
                return (prompt, op.apply(lhs, rhs));
            }
            log::trace!("Prompt {:?} already asked, drawing again", prompt);
        }
    }

    /// The solution plus distinct distractors near it, shuffled.
    /// Returns the choices and the index of the solution among them.
    fn build_choices(&mut self, solution: i64) -> (Vec<String>, usize) {
        let choice_count = self
            .rng
            .uniform_int(MIN_CHOICES as i64, MAX_CHOICES as i64 + 1) as usize;

        let solution_text = solution.to_string();
        let mut choices = vec![solution_text.clone()];
        while choices.len() < choice_count {
            let distractor = self
                .rng
                .uniform_int(solution - DISTRACTOR_SPREAD, solution + DISTRACTOR_SPREAD + 1)
                .to_string();
            // The solution itself can come up here too, it's just another duplicate
            if !choices.contains(&distractor) {
                choices.push(distractor);
            }
        }

        // We shuffle the choices so the correct one isn't always the first one
        quiz::shuffle(&mut self.rng, &mut choices);
        let correct_index = choices
            .iter()
            .position(|choice| *choice == solution_text)
            .expect("solution must stay among the choices after shuffling");

        // returns
        (choices, correct_index)
    }
}

impl<R: RandomSource> QuestionPool for ArithmeticGeneratorPool<R> {
    fn next_question(&mut self) -> Option<Question> {
        // Every possible prompt has been used, retrying would spin forever
        if self.state.asked_count() >= PROMPT_SPACE {
            log::warn!("All {} arithmetic prompts have been asked", PROMPT_SPACE);
            return None;
        }

        let (prompt, solution) = self.draw_expression();
        let (choices, correct_index) = self.build_choices(solution);

        log::debug!(
            "Generated {:?} with {} choices (solution {})",
            prompt,
            choices.len(),
            solution
        );
        Some(self.state.select(Question::new(prompt, choices, correct_index)))
    }

    fn state(&self) -> &PoolState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PoolState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::quiz::testing::ScriptedRandom;

    fn solution_of(prompt: &str) -> i64 {
        let parts: Vec<&str> = prompt.split(' ').collect();
        let lhs: i64 = parts[0].parse().unwrap();
        let rhs: i64 = parts[2].parse().unwrap();
        let op = match parts[1] {
            "+" => Operator::Add,
            "-" => Operator::Sub,
            "*" => Operator::Mul,
            other => panic!("unexpected operator {}", other),
        };
        op.apply(lhs, rhs)
    }

    #[test]
    fn operators_compute() {
        assert_eq!(Operator::Add.apply(7, 3), 10);
        assert_eq!(Operator::Sub.apply(7, 3), 4);
        assert_eq!(Operator::Mul.apply(7, 3), 21);
        assert_eq!(Operator::Sub.apply(3, 99), -96);
    }

    #[test]
    fn prompt_uses_operator_symbol() {
        assert_eq!(render_prompt(7, Operator::Mul, 3), "7 * 3 =");
        assert_eq!(render_prompt(0, Operator::Sub, 42), "0 - 42 =");
    }

    #[test]
    fn scripted_question() {
        // 7 + 3, three choices, distractor draws "11", then "10" (duplicate), then "5"
        let mut pool = ArithmeticGeneratorPool::with_rng(ScriptedRandom::new(&[
            7, 3, 0, 3, 11, 10, 5,
        ]));
        let question = pool.next_question().unwrap();
        assert_eq!(question.prompt(), "7 + 3 =");
        assert_eq!(question.choices(), &["10", "11", "5"]);
        assert_eq!(question.correct_index(), 0);
        assert!(pool.check_answer("10"));
        assert!(!pool.check_answer("11"));
    }

    #[test]
    fn distractors_may_be_negative() {
        // 0 - 5 = -5, four choices at the bottom edge of the window
        let mut pool = ArithmeticGeneratorPool::with_rng(ScriptedRandom::new(&[
            0, 5, 1, 4, -15, -14, -13,
        ]));
        let question = pool.next_question().unwrap();
        assert_eq!(question.prompt(), "0 - 5 =");
        assert_eq!(question.choices(), &["-5", "-15", "-14", "-13"]);
        assert_eq!(question.correct_answer(), "-5");
    }

    #[test]
    fn repeated_prompt_is_redrawn() {
        let mut pool = ArithmeticGeneratorPool::with_rng(ScriptedRandom::new(&[
            2, 2, 2, 3, 5, 6, 2, 1, // 2 * 2 = 4, shuffle keeps the order
            2, 2, 2, // same prompt again, rejected
            2, 2, 0, 3, 5, 6, 2, 1, // 2 + 2 = 4
        ]));
        let first = pool.next_question().unwrap();
        assert_eq!(first.prompt(), "2 * 2 =");
        assert_eq!(first.choices(), &["4", "5", "6"]);

        let second = pool.next_question().unwrap();
        assert_eq!(second.prompt(), "2 + 2 =");
        assert_eq!(second.choices(), &["4", "5", "6"]);
        assert!(pool.has_been_asked(&first));
        assert!(pool.has_been_asked(&second));
    }

    #[test]
    fn generated_questions_are_well_formed() {
        let mut pool = ArithmeticGeneratorPool::with_rng(StdRng::seed_from_u64(2024));
        let mut prompts = HashSet::new();
        for _ in 0..500 {
            let question = pool.next_question().unwrap();
            let solution = solution_of(question.prompt()).to_string();
            let choices = question.choices();

            assert!((MIN_CHOICES..=MAX_CHOICES).contains(&choices.len()));
            assert_eq!(choices.iter().filter(|c| **c == solution).count(), 1);
            assert_eq!(choices[question.correct_index()], solution);

            let unique: HashSet<&String> = choices.iter().collect();
            assert_eq!(unique.len(), choices.len());

            for choice in choices {
                let value: i64 = choice.parse().unwrap();
                let target: i64 = solution.parse().unwrap();
                assert!((value - target).abs() <= DISTRACTOR_SPREAD);
                assert_eq!(pool.check_answer(choice), *choice == solution);
            }

            assert!(prompts.insert(question.prompt().to_string()));
            assert!(pool.has_been_asked(&question));
        }
    }

    #[test]
    fn reset_forgets_prompts() {
        let mut pool = ArithmeticGeneratorPool::with_rng(ScriptedRandom::new(&[
            7, 3, 0, 3, 11, 12, 2, 1, // 7 + 3
            7, 3, 0, 3, 11, 12, 2, 1, // same again after the reset
        ]));
        let first = pool.next_question().unwrap();
        assert_eq!(first.prompt(), "7 + 3 =");
        pool.reset();
        assert!(!pool.has_been_asked(&first));

        let second = pool.next_question().unwrap();
        assert_eq!(second, first);
        assert!(pool.has_been_asked(&second));
    }

    #[test]
    fn every_prompt_once_then_none() {
        let mut pool = ArithmeticGeneratorPool::with_rng(StdRng::seed_from_u64(1));
        let mut prompts = HashSet::new();
        while let Some(question) = pool.next_question() {
            assert!(prompts.insert(question.prompt().to_string()));
        }
        assert_eq!(prompts.len(), PROMPT_SPACE);
        assert!(pool.next_question().is_none());

        pool.reset();
        assert!(pool.next_question().is_some());
    }
}
