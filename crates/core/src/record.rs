use serde::{Deserialize, Serialize};

/// Stage a record lands in when it carries no stage of its own.
pub const DEFAULT_STAGE: &str = "0";
/// Intent a record lands in when it carries no intent of its own.
pub const DEFAULT_INTENT: &str = "GENERAL";

/// A single question as supplied by a record source.
///
/// Records are never modified once loaded. Missing identifiers are resolved
/// through [`QuestionRecord::stage_id`] and [`QuestionRecord::intent_id`] so
/// that the record handed back to the presentation layer is exactly the one
/// that was authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub is_follow_up: bool,
    #[serde(default)]
    pub parent_intent: Option<String>,
}

impl QuestionRecord {
    /// Creates a plain (non follow-up) question in the given stage and intent.
    pub fn new(
        content: impl Into<String>,
        stage: impl Into<String>,
        intent: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            translation: None,
            stage: Some(stage.into()),
            intent: Some(intent.into()),
            is_follow_up: false,
            parent_intent: None,
        }
    }

    /// Marks this record as a follow-up of `parent_intent`.
    pub fn follow_up_of(mut self, parent_intent: impl Into<String>) -> Self {
        self.is_follow_up = true;
        self.parent_intent = Some(parent_intent.into());
        self
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    /// Returns `false` for records whose content is empty or whitespace.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    pub fn stage_id(&self) -> &str {
        non_blank(self.stage.as_deref()).unwrap_or(DEFAULT_STAGE)
    }

    pub fn intent_id(&self) -> &str {
        non_blank(self.intent.as_deref()).unwrap_or(DEFAULT_INTENT)
    }

    /// The parent intent, only when this record is flagged as a follow-up.
    pub fn parent_intent_id(&self) -> Option<&str> {
        if self.is_follow_up {
            non_blank(self.parent_intent.as_deref())
        } else {
            None
        }
    }

    /// The translation, if it holds anything other than whitespace.
    pub fn translation_text(&self) -> Option<&str> {
        non_blank(self.translation.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
