//! Question Bank
//!
//! Groups raw records by stage and then by intent. Each intent keeps its
//! primary variants apart from the follow-ups that hang off it. The bank is
//! owned by a single session and is consumed destructively as intents run dry.

use crate::config::SchedulerConfig;
use crate::record::QuestionRecord;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The questions available for one intent within a stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentGroup {
    pub variants: Vec<QuestionRecord>,
    pub follow_ups: Vec<QuestionRecord>,
}

impl IntentGroup {
    /// An intent without variants can no longer be selected.
    pub fn is_exhausted(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Intent groups of a single stage, keyed by intent id.
pub type StageIntents = BTreeMap<String, IntentGroup>;

/// Stage id to intent id to [`IntentGroup`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionBank {
    stages: BTreeMap<String, StageIntents>,
}

impl QuestionBank {
    /// Builds a fresh bank from `records`.
    ///
    /// The first pass creates every stage and intent that has at least one
    /// record with content, filing non follow-ups (and follow-ups of
    /// independent intents) as variants. The second pass attaches every
    /// remaining follow-up to each intent group, in any stage, whose id equals
    /// its parent intent. Follow-ups whose parent never appears are dropped.
    pub fn build(records: &[QuestionRecord], config: &SchedulerConfig) -> Self {
        let mut stages: BTreeMap<String, StageIntents> = BTreeMap::new();
        let usable = || records.iter().filter(|r| r.has_content());

        for record in usable() {
            let group = stages
                .entry(record.stage_id().to_string())
                .or_default()
                .entry(record.intent_id().to_string())
                .or_default();

            if config.is_independent(record.intent_id()) || !record.is_follow_up {
                group.variants.push(record.clone());
            }
        }

        let mut attached = 0usize;
        for record in usable() {
            if config.is_independent(record.intent_id()) {
                continue;
            }
            let Some(parent) = record.parent_intent_id() else {
                continue;
            };

            let mut found = false;
            for intents in stages.values_mut() {
                if let Some(group) = intents.get_mut(parent) {
                    group.follow_ups.push(record.clone());
                    found = true;
                }
            }
            if found {
                attached += 1;
            } else {
                debug!(parent = %parent, content = %record.content, "Dropping follow-up with unknown parent intent");
            }
        }

        let bank = Self { stages };
        info!(
            stages = bank.stage_count(),
            intents = bank.intent_count(),
            follow_ups = attached,
            "Question bank built"
        );
        bank
    }

    pub fn stage(&self, stage: &str) -> Option<&StageIntents> {
        self.stages.get(stage)
    }

    pub fn stage_mut(&mut self, stage: &str) -> Option<&mut StageIntents> {
        self.stages.get_mut(stage)
    }

    /// True when the stage is unknown or all its intents have been retired.
    pub fn is_stage_drained(&self, stage: &str) -> bool {
        self.stages.get(stage).is_none_or(|intents| intents.is_empty())
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Number of intent groups still present across all stages.
    pub fn intent_count(&self) -> usize {
        self.stages.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
