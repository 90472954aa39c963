use crate::record::QuestionRecord;
use std::collections::VecDeque;

/// Pending follow-up questions. While non-empty it takes priority over fresh
/// intent selection.
#[derive(Debug, Clone, Default)]
pub struct FollowUpQueue {
    pending: VecDeque<QuestionRecord>,
}

impl FollowUpQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<QuestionRecord> {
        self.pending.pop_front()
    }

    /// Replaces the whole queue with `follow_ups`. Leftovers are discarded,
    /// never appended to.
    pub fn replace_with(&mut self, follow_ups: &[QuestionRecord]) {
        self.pending = follow_ups.iter().cloned().collect();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
