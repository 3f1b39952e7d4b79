use std::fmt::Write as _;
use std::io::Write as _;

use services::{Cue, CueEmitter, Intent, SessionSnapshot};

/// A line of user input, decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Intent(Intent),
    Quit,
}

/// `s` start, `1`..`9` select, `n` next, `r` restart, `q` quit.
pub fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "s" | "start" => Some(Input::Intent(Intent::Start)),
        "n" | "next" => Some(Input::Intent(Intent::Advance)),
        "r" | "restart" => Some(Input::Intent(Intent::Restart)),
        "q" | "quit" => Some(Input::Quit),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(|n| Input::Intent(Intent::SelectChoice(n - 1))),
    }
}

/// Render the change between two snapshots. A pure countdown step renders as
/// a single timer line; anything else redraws the full card.
pub fn render_update(prev: Option<&SessionSnapshot>, next: &SessionSnapshot) -> String {
    if let Some(prev) = prev {
        let only_timer = SessionSnapshot {
            remaining_secs: next.remaining_secs,
            ..prev.clone()
        } == *next;
        if only_timer {
            return timer_line(next);
        }
    }
    render(next)
}

pub fn render(snap: &SessionSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Question {}/{}  score {}", snap.question_number(), snap.total, snap.score);

    let Some(question) = snap.question.as_ref().filter(|_| snap.started) else {
        let _ = writeln!(
            out,
            "{} questions, {}s each. Type `s` to start.",
            snap.total, snap.budget_secs
        );
        return out;
    };

    out.push_str(&timer_line(snap));
    let _ = writeln!(out, "{}", question.prompt());
    for (idx, choice) in question.choices().iter().enumerate() {
        let marker = if snap.locked && question.is_correct(idx) {
            '+'
        } else if snap.selected_index == Some(idx) {
            'x'
        } else {
            ' '
        };
        let _ = writeln!(out, " [{marker}] {}. {choice}", idx + 1);
    }

    if snap.explanation_visible {
        if !question.explanation().is_empty() {
            let _ = writeln!(out, "{}", question.explanation());
        }
        let next = if snap.is_last_question() { "finish" } else { "next" };
        let _ = writeln!(out, "Type `n` for {next} or `r` to restart.");
    } else if !snap.locked {
        let _ = writeln!(out, "Pick 1-{}.", question.choice_count());
    }
    out
}

fn timer_line(snap: &SessionSnapshot) -> String {
    const WIDTH: usize = 20;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = (snap.elapsed_fraction() * WIDTH as f32).round() as usize;
    let filled = filled.min(WIDTH);
    format!(
        "[{}{}] {}s left\n",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        snap.remaining_secs
    )
}

/// Writes cues to stderr; warnings ring the terminal bell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleCues;

impl CueEmitter for ConsoleCues {
    fn emit(&self, cue: Cue) {
        let mut stderr = std::io::stderr().lock();
        let bell = if cue == Cue::TickWarning { "\x07" } else { "" };
        let _ = writeln!(stderr, "{bell}<{cue}>");
    }
}
