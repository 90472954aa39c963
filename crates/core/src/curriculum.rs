//! Stage Curriculum
//!
//! Hands out stage ids group by group. A single-stage group is delivered
//! as declared; a multi-stage group is shuffled once when it is first reached
//! and then drained front to back. No stage of group `i + 1` is handed out
//! before group `i` is empty.

use crate::random::RandomSource;
use std::collections::VecDeque;
use tracing::debug;

/// Cursor over an ordered list of stage-groups.
#[derive(Debug, Clone)]
pub struct StageScheduler {
    groups: Vec<Vec<String>>,
    next_group: usize,
    pending: VecDeque<String>,
}

impl StageScheduler {
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        Self {
            groups,
            next_group: 0,
            pending: VecDeque::new(),
        }
    }

    /// Returns the next stage id, or `None` once every group is drained.
    ///
    /// Empty groups are skipped. Calling again after `None` keeps returning
    /// `None`.
    pub fn next_stage(&mut self, rng: &mut dyn RandomSource) -> Option<String> {
        while self.pending.is_empty() {
            let group = self.groups.get(self.next_group)?;
            self.next_group += 1;

            let mut order = group.clone();
            if order.len() > 1 {
                rng.shuffle(&mut order);
            }
            debug!(group = self.next_group, stages = ?order, "Entering stage group");
            self.pending = order.into();
        }
        self.pending.pop_front()
    }

    /// One-based position of the group currently being drained; zero before
    /// the first group is entered.
    pub fn group_position(&self) -> usize {
        self.next_group
    }

    pub fn total_groups(&self) -> usize {
        self.groups.len()
    }

    /// Stages of the current group not yet handed out.
    pub fn pending_in_group(&self) -> usize {
        self.pending.len()
    }

    /// Groups not yet fully handed out, counting the current one if it still
    /// has stages pending.
    pub fn remaining_groups(&self) -> usize {
        self.groups.len() - self.next_group + usize::from(!self.pending.is_empty())
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_groups() == 0
    }
}
