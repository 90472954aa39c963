//! Interview Coach
//!
//! Session lifecycle around [`InterviewSession`]: keeps the configuration and
//! the loaded records, builds a fresh bank on every start or restart, and
//! refuses to schedule before anything was built.

use crate::Prompt;
use crate::bank::QuestionBank;
use crate::config::{ConfigError, SchedulerConfig};
use crate::engine::{InterviewSession, Progress};
use crate::random::{RandomSource, RngSource};
use crate::record::QuestionRecord;
use std::sync::Arc;
use tracing::info;

/// Errors surfaced by [`InterviewCoach`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No question bank has been built; start a session first")]
    NotStarted,
    #[error("The question bank is empty")]
    EmptyBank,
}

/// Produces the random source for each new session.
pub type RandomFactory = Box<dyn FnMut() -> Box<dyn RandomSource> + Send>;

/// Owns the records and configuration for repeated practice sessions.
pub struct InterviewCoach {
    config: Arc<SchedulerConfig>,
    records: Vec<QuestionRecord>,
    random: RandomFactory,
    session: Option<InterviewSession>,
}

impl InterviewCoach {
    /// Creates a coach; no session exists until [`InterviewCoach::start`].
    ///
    /// The configuration is validated here, so a hand-built
    /// [`SchedulerConfig`] is held to the same rules as one loaded from JSON.
    pub fn new(config: SchedulerConfig, random: RandomFactory) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            records: Vec::new(),
            random,
            session: None,
        })
    }

    /// A coach whose sessions draw from `StdRng`s seeded with `seed`, `seed + 1`,
    /// and so on, one per session.
    pub fn seeded(config: SchedulerConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut next = seed;
        Self::new(
            config,
            Box::new(move || {
                let rng = RngSource::seeded(next);
                next = next.wrapping_add(1);
                Box::new(rng) as Box<dyn RandomSource>
            }),
        )
    }

    pub fn with_entropy(config: SchedulerConfig) -> Result<Self, ConfigError> {
        Self::new(
            config,
            Box::new(|| Box::new(RngSource::from_entropy()) as Box<dyn RandomSource>),
        )
    }

    /// Builds a bank from `records` and starts a session over it.
    ///
    /// Fails with [`SessionError::EmptyBank`] if no record yields a stage; any
    /// previous session is left untouched in that case.
    pub fn start(&mut self, records: Vec<QuestionRecord>) -> Result<(), SessionError> {
        let bank = QuestionBank::build(&records, &self.config);
        if bank.is_empty() {
            return Err(SessionError::EmptyBank);
        }
        self.records = records;
        self.session = Some(InterviewSession::new(
            bank,
            self.config.clone(),
            (self.random)(),
        ));
        Ok(())
    }

    /// Discards the running session and begins a new one over the same records.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.session.is_none() {
            return Err(SessionError::NotStarted);
        }
        info!("Restarting interview session");
        self.start(self.records.clone())
    }

    pub fn next_question(&mut self) -> Result<Prompt, SessionError> {
        self.session
            .as_mut()
            .map(InterviewSession::next_question)
            .ok_or(SessionError::NotStarted)
    }

    pub fn progress(&self) -> Result<Progress, SessionError> {
        self.session
            .as_ref()
            .map(InterviewSession::progress)
            .ok_or(SessionError::NotStarted)
    }

    pub fn session(&self) -> Option<&InterviewSession> {
        self.session.as_ref()
    }
}
