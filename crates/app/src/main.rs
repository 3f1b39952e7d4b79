mod console;

use std::fmt;
use std::path::PathBuf;

use quiz_core::model::QuizSettings;
use services::{QuizSession, SessionError, SessionSnapshot, spawn_quiz};
use storage::{InMemoryRepository, JsonFileRepository, QuestionRepository, builtin_questions};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::console::{ConsoleCues, Input, parse_input, render, render_update};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBudget { raw: String },
    InvalidBankPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBudget { raw } => write!(f, "invalid --budget value: {raw}"),
            ArgsError::InvalidBankPath { raw } => write!(f, "invalid --bank value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--bank <questions.json>] [--budget <secs>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  built-in photosynthesis bank, 20 seconds per question");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK_PATH, QUIZ_BUDGET_SECS, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    bank_path: Option<PathBuf>,
    budget_secs: Option<u32>,
    help: bool,
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut bank_path = env("QUIZ_BANK_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let mut budget_secs = env("QUIZ_BUDGET_SECS")
            .map(|raw| parse_budget(&raw))
            .transpose()?;
        let mut help = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    let value = require_value(&mut args, "--bank")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidBankPath { raw: value });
                    }
                    bank_path = Some(PathBuf::from(value));
                }
                "--budget" => {
                    let value = require_value(&mut args, "--budget")?;
                    budget_secs = Some(parse_budget(&value)?);
                }
                "--help" | "-h" => help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            bank_path,
            budget_secs,
            help,
        })
    }

    fn settings(&self) -> Result<QuizSettings, SessionError> {
        Ok(match self.budget_secs {
            Some(secs) => QuizSettings::with_budget(secs)?,
            None => QuizSettings::default(),
        })
    }

    fn repository(&self) -> Box<dyn QuestionRepository> {
        match &self.bank_path {
            Some(path) => Box::new(JsonFileRepository::new(path)),
            None => Box::new(InMemoryRepository::with_questions(builtin_questions())),
        }
    }
}

fn parse_budget(raw: &str) -> Result<u32, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidBudget {
        raw: raw.to_string(),
    })
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let settings = args.settings()?;
    let repo = args.repository();
    let session = QuizSession::from_repository(&*repo, settings, ConsoleCues).await?;
    tracing::info!(questions = session.bank().len(), "quiz ready");

    let handle = spawn_quiz(session);
    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut shown: SessionSnapshot = handle.snapshot();
    print!("{}", render(&shown));

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = updates.borrow_and_update().clone();
                print!("{}", render_update(Some(&shown), &next));
                shown = next;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(Input::Intent(intent)) => handle.send(intent)?,
                    None if line.trim().is_empty() => {}
                    None => eprintln!("unrecognised input: {}", line.trim()),
                }
            }
        }
    }

    handle.shutdown().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
