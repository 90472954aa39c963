//! Main Entrypoint for the Interview Coach
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and command line.
//! 2. Loading the scheduler tuning and the question records.
//! 3. Starting a session and driving it from the terminal.

use anyhow::Context;
use clap::Parser;
use interview_coach::{
    config::Config,
    console::{self, Outcome},
};
use interview_core::{coach::InterviewCoach, source};
use std::io;
use std::path::PathBuf;
use tracing::info;

/// Practice an adaptive mock interview in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Question file path or http(s) URL. Overrides COACH_QUESTIONS.
    #[arg(long)]
    questions: Option<String>,
    /// JSON schedule file. Overrides COACH_SCHEDULE.
    #[arg(long)]
    schedule: Option<PathBuf>,
    /// Seed for a reproducible session. Overrides COACH_SEED.
    #[arg(long)]
    seed: Option<u64>,
    /// Print every question of one session and exit.
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // --- 1. Load Configuration ---
    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_overrides(args.questions, args.schedule, args.seed);

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(io::stderr)
        .init();
    info!("Configuration loaded. Loading question bank...");

    // --- 3. Load Schedule and Records ---
    let schedule = config
        .scheduler_config()
        .context("Failed to load interview schedule")?;
    let question_source = source::from_location(&config.questions);
    let records = question_source
        .load()
        .await
        .with_context(|| format!("Failed to load questions from {}", question_source.describe()))?;
    info!(records = records.len(), source = %question_source.describe(), "Question records loaded");

    // --- 4. Start Session ---
    let mut coach = match config.seed {
        Some(seed) => InterviewCoach::seeded(schedule, seed),
        None => InterviewCoach::with_entropy(schedule),
    }
    .context("Invalid interview schedule")?;
    coach
        .start(records)
        .context("Failed to start interview session")?;

    // --- 5. Run ---
    if args.dump {
        let asked = console::dump(&mut coach, io::stdout().lock())?;
        info!(questions = asked, "Session dumped");
        return Ok(());
    }

    let outcome = console::run_interactive(&mut coach, io::stdin().lock(), io::stdout().lock())?;
    let progress = coach.progress()?;
    info!(
        outcome = ?outcome,
        questions = progress.questions_asked,
        completed = matches!(outcome, Outcome::Completed),
        "Session finished"
    );
    Ok(())
}
