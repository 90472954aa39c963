pub mod bank;
pub mod coach;
pub mod config;
pub mod curriculum;
pub mod engine;
pub mod followup;
pub mod random;
pub mod record;
pub mod source;

use record::QuestionRecord;

/// Text shown to the candidate when the curriculum has been fully covered.
pub const COMPLETION_MESSAGE: &str = "Interview complete! You did a great job.";

/// What the scheduler hands to the presentation layer.
///
/// Completion is its own variant so that callers never have to compare
/// question text against a sentinel string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Ask this question next.
    Question(QuestionRecord),
    /// Every stage of the curriculum has been drained.
    Complete,
}

impl Prompt {
    pub fn is_complete(&self) -> bool {
        matches!(self, Prompt::Complete)
    }

    pub fn question(&self) -> Option<&QuestionRecord> {
        match self {
            Prompt::Question(record) => Some(record),
            Prompt::Complete => None,
        }
    }
}
