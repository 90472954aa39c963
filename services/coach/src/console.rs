//! Terminal presentation for a practice session.
//!
//! Prints each question (with its translation underneath, when there is one)
//! and turns the candidate's input lines into session actions.

use anyhow::Result;
use interview_core::coach::InterviewCoach;
use interview_core::engine::Progress;
use interview_core::record::QuestionRecord;
use interview_core::{COMPLETION_MESSAGE, Prompt};
use std::io::{BufRead, Write};
use tracing::info;

const HELP: &str = "Press Enter for the next question, 's' for status, 'r' to restart, 'q' to quit.";

/// What the candidate asked for on one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Status,
    Restart,
    Bookmark,
    Quit,
}

impl Action {
    /// Maps an input line to an action; `None` for anything unrecognised.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "n" | "next" => Some(Action::Next),
            "s" | "status" => Some(Action::Status),
            "r" | "restart" => Some(Action::Restart),
            "b" | "bookmark" => Some(Action::Bookmark),
            "q" | "quit" | "exit" => Some(Action::Quit),
            _ => None,
        }
    }
}

/// How an interactive run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Quit,
}

/// Formats a question card: counter and progress label, the question, and
/// the translation indented below it.
pub fn render_question(record: &QuestionRecord, progress: &Progress) -> String {
    let mut card = format!(
        "[{}] {}\n{}",
        progress.questions_asked, progress, record.content
    );
    if let Some(translation) = record.translation_text() {
        card.push_str("\n    ");
        card.push_str(translation);
    }
    card
}

/// Asks the next question. Returns `true` once the interview is complete.
fn ask(coach: &mut InterviewCoach, out: &mut impl Write) -> Result<bool> {
    match coach.next_question()? {
        Prompt::Question(record) => {
            let progress = coach.progress()?;
            writeln!(out, "\n{}", render_question(&record, &progress))?;
            Ok(false)
        }
        Prompt::Complete => {
            writeln!(out, "\n{}", COMPLETION_MESSAGE)?;
            Ok(true)
        }
    }
}

/// Runs a started session against line-based input until the curriculum is
/// exhausted, the candidate quits, or input ends.
pub fn run_interactive(
    coach: &mut InterviewCoach,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<Outcome> {
    writeln!(out, "{}", HELP)?;
    if ask(coach, &mut out)? {
        return Ok(Outcome::Completed);
    }

    for line in input.lines() {
        let line = line?;
        let Some(action) = Action::parse(&line) else {
            writeln!(out, "{}", HELP)?;
            continue;
        };

        match action {
            Action::Next => {
                if ask(coach, &mut out)? {
                    return Ok(Outcome::Completed);
                }
            }
            Action::Status => {
                let progress = coach.progress()?;
                writeln!(out, "{}", serde_json::to_string_pretty(&progress)?)?;
            }
            Action::Restart => {
                coach.restart()?;
                writeln!(out, "Starting over.")?;
                if ask(coach, &mut out)? {
                    return Ok(Outcome::Completed);
                }
            }
            Action::Bookmark => writeln!(out, "Bookmarks are not available yet.")?,
            Action::Quit => {
                info!("Candidate quit the session");
                return Ok(Outcome::Quit);
            }
        }
    }
    Ok(Outcome::Quit)
}

/// Prints the whole session without waiting for input.
pub fn dump(coach: &mut InterviewCoach, mut out: impl Write) -> Result<usize> {
    while !ask(coach, &mut out)? {}
    Ok(coach.progress()?.questions_asked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::config::SchedulerConfig;
    use interview_core::source::{CsvFileSource, QuestionSource};
    use std::io::Cursor;

    fn started_coach() -> InterviewCoach {
        let config = SchedulerConfig {
            curriculum: vec![vec!["0".to_string()], vec!["1".to_string()]],
            ..SchedulerConfig::default()
        };
        let mut coach = InterviewCoach::seeded(config, 11).unwrap();
        coach
            .start(vec![
                QuestionRecord::new("What is your name?", "0", "Chat")
                    .with_translation("你叫什麼名字？"),
                QuestionRecord::new("Where do you work?", "1", "employment"),
            ])
            .unwrap();
        coach
    }

    fn run(input: &str) -> (Outcome, String) {
        let mut coach = started_coach();
        let mut out = Vec::new();
        let outcome = run_interactive(&mut coach, Cursor::new(input), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(Action::parse(""), Some(Action::Next));
        assert_eq!(Action::parse("  R "), Some(Action::Restart));
        assert_eq!(Action::parse("status"), Some(Action::Status));
        assert_eq!(Action::parse("b"), Some(Action::Bookmark));
        assert_eq!(Action::parse("quit"), Some(Action::Quit));
        assert_eq!(Action::parse("what?"), None);
    }

    #[test]
    fn test_render_question_with_translation() {
        let record = QuestionRecord::new("Q?", "0", "Chat").with_translation("問？");
        let progress = Progress {
            questions_asked: 3,
            stages_entered: 1,
            current_stage: Some("0".to_string()),
            group_position: 2,
            total_groups: 5,
            remaining_groups: 4,
            pending_follow_ups: 0,
        };
        assert_eq!(render_question(&record, &progress), "[3] Group 2/5\nQ?\n    問？");
    }

    #[test]
    fn test_runs_to_completion() {
        let (outcome, output) = run("\n\n");
        assert_eq!(outcome, Outcome::Completed);
        assert!(output.contains("What is your name?\n    你叫什麼名字？"));
        assert!(output.contains("[2] Finishing\nWhere do you work?"));
        assert!(output.trim_end().ends_with(COMPLETION_MESSAGE));
    }

    #[test]
    fn test_quit_and_end_of_input() {
        let (outcome, output) = run("q\n");
        assert_eq!(outcome, Outcome::Quit);
        assert!(!output.contains("Where do you work?"));

        let (outcome, _) = run("");
        assert_eq!(outcome, Outcome::Quit);
    }

    #[test]
    fn test_restart_status_and_bookmark() {
        let (outcome, output) = run("b\ns\nr\nq\n");
        assert_eq!(outcome, Outcome::Quit);
        assert!(output.contains("Bookmarks are not available yet."));
        assert!(output.contains("\"questions_asked\": 1"));
        assert!(output.contains("Starting over."));
        assert_eq!(output.matches("What is your name?").count(), 2);
    }

    #[test]
    fn test_dump_prints_everything() {
        let mut coach = started_coach();
        let mut out = Vec::new();
        assert_eq!(dump(&mut coach, &mut out).unwrap(), 2);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Where do you work?"));
        assert!(output.contains(COMPLETION_MESSAGE));
    }

    #[tokio::test]
    async fn test_sample_deck_under_n400_schedule() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_questions.csv");
        let records = CsvFileSource::new(path).load().await.unwrap();

        for seed in 0..5 {
            let mut coach = InterviewCoach::seeded(SchedulerConfig::n400(), seed).unwrap();
            coach.start(records.clone()).unwrap();
            let mut out = Vec::new();
            dump(&mut coach, &mut out).unwrap();
            let output = String::from_utf8(out).unwrap();

            assert!(output.starts_with("\n[1] Group 1/24\n"));

            let chat = [
                "How are you today?",
                "How did you get here today?",
                "Did you bring your green card?",
                "What is today's date?",
                "Is it cold outside?",
            ];
            assert_eq!(chat.iter().filter(|q| output.contains(*q)).count(), 4);

            let swear = output.find("Do you swear that").unwrap();
            let oath = output.find("Do you understand what an oath is?").unwrap();
            let hand = output.find("Please raise your right hand.").unwrap();
            assert!(swear < oath && oath < hand);

            assert!(output.contains("Do you support the Constitution?"));
            assert!(output.trim_end().ends_with(COMPLETION_MESSAGE));
        }
    }
}
