use std::io::{self, BufRead, Write};
use std::time::Instant;

use dotenv::dotenv;
use true_false_quiz::config::{GameMode, RoundConfig};
use true_false_quiz::quiz::Question;
use true_false_quiz::round::{RoundController, RoundStep, Verdict};

const CHOICE_LABELS: &str = "abcd";

type MainResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> MainResult {
    // The .env file is optional, every setting has a default
    let _ = dotenv();

    pretty_env_logger::init();
    log::info!("Starting quiz...");

    let config = RoundConfig::from_env()?;
    let mut controller = RoundController::new(&config);

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        if !play_round(&mut controller, &mut input)? {
            break;
        }

        let reply = ask(&mut input, "Play again? [y/N/switch] ")?;
        match reply.as_deref().map(str::trim) {
            Some("y") | Some("Y") => controller.play_again(),
            Some("switch") => {
                let mode = match controller.mode() {
                    GameMode::Facts => GameMode::Arithmetic,
                    GameMode::Arithmetic => GameMode::Facts,
                };
                controller.switch_mode(mode);
            }
            _ => break,
        }
    }

    log::info!("Bye!");
    Ok(())
}

/// Plays one round to the end. Returns false if the input was closed midway.
fn play_round(
    controller: &mut RoundController,
    input: &mut impl BufRead,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut question_number = 0;
    loop {
        let question = match controller.next_step()? {
            RoundStep::Question(question) => question,
            RoundStep::Finished(score) => {
                println!("\n{}", score);
                return Ok(true);
            }
        };
        question_number += 1;

        print_question(question_number, &question);
        if let Some(limit) = controller.time_limit() {
            println!("You have {} seconds.", limit.as_secs());
        }
        let started = Instant::now();
        let answer = match ask(input, "> ")? {
            Some(line) => resolve_choice(&question, line.trim()),
            None => return Ok(false),
        };

        match controller.submit_answer(&answer, started.elapsed())? {
            Verdict::Correct => println!("Correct!"),
            Verdict::Incorrect => println!("Sorry, wrong answer!"),
            Verdict::TimedOut => println!("Time's up!"),
        }
    }
}

fn print_question(number: usize, question: &Question) {
    println!("\nQuestion #{}: {}", number, question.prompt());
    for (label, choice) in CHOICE_LABELS.chars().zip(question.choices()) {
        println!("  ({}) {}", label, choice);
    }
}

/// Accepts either the letter printed next to a choice or the choice text itself.
fn resolve_choice(question: &Question, line: &str) -> String {
    let picked = CHOICE_LABELS
        .chars()
        .zip(question.choices())
        .find(|(label, _)| line.len() == 1 && line.starts_with(*label));
    if let Some((_, choice)) = picked {
        return choice.clone();
    }
    return line.to_string();
}

fn ask(input: &mut impl BufRead, prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
