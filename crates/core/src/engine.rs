//! Intent Selection Engine
//!
//! Decides which question comes next. Pending follow-ups always win; otherwise
//! an intent is drawn from the current stage, a variant is drawn from that
//! intent according to its policy, usage is counted against the intent's limit,
//! and the intent's follow-ups may be queued. Exhausted intents and stages are
//! dropped as the session goes, until the curriculum runs out.

use crate::Prompt;
use crate::bank::QuestionBank;
use crate::config::SchedulerConfig;
use crate::curriculum::StageScheduler;
use crate::followup::FollowUpQueue;
use crate::random::RandomSource;
use crate::record::QuestionRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// State of one practice session.
///
/// Owns its bank outright and consumes it; restarting means building a new
/// session rather than resetting this one.
pub struct InterviewSession {
    config: Arc<SchedulerConfig>,
    bank: QuestionBank,
    scheduler: StageScheduler,
    rng: Box<dyn RandomSource>,
    current_stage: Option<String>,
    intent_usage: HashMap<String, u32>,
    sequence_cursor: HashMap<String, usize>,
    follow_ups: FollowUpQueue,
    questions_asked: usize,
    stages_entered: usize,
    complete: bool,
}

impl InterviewSession {
    /// Starts a session over `bank`. The first stage is drawn immediately so
    /// that a current stage exists before the first question is requested.
    pub fn new(
        bank: QuestionBank,
        config: Arc<SchedulerConfig>,
        mut rng: Box<dyn RandomSource>,
    ) -> Self {
        let mut scheduler = StageScheduler::new(config.curriculum.clone());
        let current_stage = scheduler.next_stage(rng.as_mut());
        info!(stage = ?current_stage, stages = bank.stage_count(), "Interview session started");

        Self {
            config,
            bank,
            scheduler,
            rng,
            current_stage,
            intent_usage: HashMap::new(),
            sequence_cursor: HashMap::new(),
            follow_ups: FollowUpQueue::new(),
            questions_asked: 0,
            stages_entered: 0,
            complete: false,
        }
    }

    /// Returns the next question of the session.
    ///
    /// A queued follow-up is always served first. Otherwise an intent is
    /// drawn uniformly from the current stage; intents with no variants left
    /// are removed and the draw is repeated. The variant comes from the front
    /// of the intent's list for sequential intents and from a uniform draw
    /// (removing it) for all others. Usage is then counted against the
    /// intent's limit, and the intent's follow-ups replace the queue if the
    /// follow-up chance fires.
    ///
    /// # Returns
    ///
    /// [`Prompt::Question`] with the chosen record, or [`Prompt::Complete`]
    /// once every stage of the curriculum is drained. Completion is sticky:
    /// later calls keep returning [`Prompt::Complete`].
    pub fn next_question(&mut self) -> Prompt {
        if self.complete {
            return Prompt::Complete;
        }
        if let Some(follow_up) = self.follow_ups.pop() {
            return self.emit(follow_up);
        }

        // A resolved stage always holds an intent, so each pass emits or
        // removes one; the bound is only reached if the bank is inconsistent.
        let attempts = self.bank.intent_count() + 1;
        for _ in 0..attempts {
            let Some(stage) = self.ensure_stage() else {
                return self.finish();
            };
            let Some(intents) = self.bank.stage_mut(&stage) else {
                continue;
            };

            let index = self
                .rng
                .pick_index(intents.len())
                .min(intents.len().saturating_sub(1));
            let Some(intent) = intents.keys().nth(index).cloned() else {
                continue;
            };
            let Some(group) = intents.get_mut(&intent) else {
                continue;
            };

            if group.is_exhausted() {
                debug!(stage = %stage, intent = %intent, "Removing intent without variants");
                intents.remove(&intent);
                continue;
            }

            let sequential = self.config.is_sequential(&intent);
            let question = if sequential {
                let cursor = self.sequence_cursor.entry(intent.clone()).or_insert(0);
                let last = group.variants.len() - 1;
                let picked = group.variants[(*cursor).min(last)].clone();
                if *cursor <= last {
                    *cursor += 1;
                }
                picked
            } else {
                let last = group.variants.len() - 1;
                let pick = self.rng.pick_index(group.variants.len()).min(last);
                group.variants.remove(pick)
            };

            let used = self.intent_usage.entry(intent.clone()).or_insert(0);
            *used += 1;
            let used = *used;

            if !group.follow_ups.is_empty() && self.rng.chance(self.config.follow_up_probability) {
                debug!(intent = %intent, count = group.follow_ups.len(), "Queueing follow-ups");
                self.follow_ups.replace_with(&group.follow_ups);
            }

            let limit = self.config.limit_for(&intent);
            if used >= limit {
                debug!(stage = %stage, intent = %intent, used, limit, "Intent retired");
                intents.remove(&intent);
                if sequential {
                    self.sequence_cursor.remove(&intent);
                }
            }

            return self.emit(question);
        }

        warn!(
            questions = self.questions_asked,
            intents = self.bank.intent_count(),
            "No selectable intent found; ending session"
        );
        self.finish()
    }

    fn finish(&mut self) -> Prompt {
        if !self.complete {
            info!(questions = self.questions_asked, "Interview complete");
            self.complete = true;
        }
        Prompt::Complete
    }

    /// Resolves a stage that still has intents, advancing through the
    /// curriculum past empty or drained stages.
    fn ensure_stage(&mut self) -> Option<String> {
        loop {
            if let Some(stage) = &self.current_stage {
                if !self.bank.is_stage_drained(stage) {
                    return Some(stage.clone());
                }
            }
            let next = self.scheduler.next_stage(self.rng.as_mut())?;
            debug!(stage = %next, "Advancing to stage");
            self.current_stage = Some(next);
            self.stages_entered += 1;
        }
    }

    fn emit(&mut self, question: QuestionRecord) -> Prompt {
        self.questions_asked += 1;
        Prompt::Question(question)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn current_stage(&self) -> Option<&str> {
        self.current_stage.as_deref()
    }

    /// Questions drawn from `intent` so far, follow-ups excluded.
    pub fn intent_usage(&self, intent: &str) -> u32 {
        self.intent_usage.get(intent).copied().unwrap_or(0)
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn progress(&self) -> Progress {
        Progress {
            questions_asked: self.questions_asked,
            stages_entered: self.stages_entered,
            current_stage: self.current_stage.clone(),
            group_position: self.scheduler.group_position(),
            total_groups: self.scheduler.total_groups(),
            remaining_groups: self.scheduler.remaining_groups(),
            pending_follow_ups: self.follow_ups.len(),
        }
    }
}

/// Counters a front end shows while a session runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub questions_asked: usize,
    /// Stages entered after the first one.
    pub stages_entered: usize,
    pub current_stage: Option<String>,
    pub group_position: usize,
    pub total_groups: usize,
    pub remaining_groups: usize,
    pub pending_follow_ups: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.remaining_groups > 0 {
            write!(f, "Group {}/{}", self.group_position, self.total_groups)
        } else {
            write!(f, "Finishing")
        }
    }
}
