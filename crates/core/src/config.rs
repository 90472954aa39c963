//! Scheduler Configuration
//!
//! Tuning knobs consumed by the bank builder and the selection engine: how many
//! questions each intent may contribute, which intents are asked in authored
//! order, which follow-up intents stand on their own, and the stage curriculum.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Chance that answering an intent with follow-ups queues them.
pub const DEFAULT_FOLLOW_UP_PROBABILITY: f64 = 0.7;

/// Errors raised while loading or validating a [`SchedulerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read schedule file {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("Invalid schedule JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Intent '{0}' has a usage limit of zero")]
    ZeroLimit(String),
    #[error("Stage group {0} of the curriculum is empty")]
    EmptyGroup(usize),
    #[error("Stage '{0}' appears more than once in the curriculum")]
    DuplicateStage(String),
    #[error("Follow-up probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}

/// Scheduling policy supplied at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Questions allowed per intent; intents not listed get one.
    pub intent_limits: HashMap<String, u32>,
    /// Intents whose variants are asked in authored order.
    pub sequential_intents: HashSet<String>,
    /// Follow-up intents scheduled like ordinary intents instead of being
    /// attached to their parent.
    pub independent_follow_ups: HashSet<String>,
    /// Ordered stage-groups. Multi-stage groups are shuffled once per session.
    pub curriculum: Vec<Vec<String>>,
    pub follow_up_probability: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            intent_limits: HashMap::new(),
            sequential_intents: HashSet::new(),
            independent_follow_ups: HashSet::new(),
            curriculum: Vec::new(),
            follow_up_probability: DEFAULT_FOLLOW_UP_PROBABILITY,
        }
    }
}

impl SchedulerConfig {
    /// The schedule for the N-400 citizenship interview deck.
    pub fn n400() -> Self {
        let limits = [
            ("Chat", 4),
            ("takeoath", 3),
            ("takeoath_F", 1),
            ("adressA_F", 3),
            ("adressB_F", 2),
            ("MarriageA_F", 3),
            ("employmentB_F", 5),
            ("employmentC_F", 2),
            ("travelA", 4),
            ("Lasttrip", 3),
            ("Noquestion", 10),
            ("yesquestion", 7),
        ];
        let independent = [
            "takeoath_F",
            "adressA_F",
            "adressB_F",
            "MarriageA_F",
            "employmentB_F",
            "employmentC_F",
        ];

        let mut curriculum: Vec<Vec<String>> = vec![
            stage_range(0, 0),
            stage_range(1, 5),
            stage_range(6, 6),
            stage_range(7, 8),
            stage_range(9, 9),
            stage_range(10, 10),
            stage_range(11, 13),
            stage_range(14, 17),
            stage_range(18, 18),
            stage_range(19, 28),
            stage_range(29, 29),
        ];
        curriculum.extend((30..=42).map(|s| stage_range(s, s)));

        Self {
            intent_limits: limits
                .into_iter()
                .map(|(intent, limit)| (intent.to_string(), limit))
                .collect(),
            sequential_intents: HashSet::from(["takeoath".to_string()]),
            independent_follow_ups: independent.into_iter().map(String::from).collect(),
            curriculum,
            follow_up_probability: DEFAULT_FOLLOW_UP_PROBABILITY,
        }
    }

    /// Parses and validates a JSON schedule.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((intent, _)) = self.intent_limits.iter().find(|(_, limit)| **limit == 0) {
            return Err(ConfigError::ZeroLimit(intent.clone()));
        }

        let mut seen = HashSet::new();
        for (index, group) in self.curriculum.iter().enumerate() {
            if group.is_empty() {
                return Err(ConfigError::EmptyGroup(index));
            }
            for stage in group {
                if !seen.insert(stage.as_str()) {
                    return Err(ConfigError::DuplicateStage(stage.clone()));
                }
            }
        }

        if !(0.0..=1.0).contains(&self.follow_up_probability) {
            return Err(ConfigError::InvalidProbability(self.follow_up_probability));
        }
        Ok(())
    }

    pub fn limit_for(&self, intent: &str) -> u32 {
        self.intent_limits.get(intent).copied().unwrap_or(1)
    }

    pub fn is_sequential(&self, intent: &str) -> bool {
        self.sequential_intents.contains(intent)
    }

    pub fn is_independent(&self, intent: &str) -> bool {
        self.independent_follow_ups.contains(intent)
    }
}

fn stage_range(first: u32, last: u32) -> Vec<String> {
    (first..=last).map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_limit_defaults_to_one() {
        let config = SchedulerConfig::n400();
        assert_eq!(config.limit_for("Chat"), 4);
        assert_eq!(config.limit_for("unlisted"), 1);
    }

    #[test]
    fn test_n400_preset_is_valid() {
        let config = SchedulerConfig::n400();
        config.validate().expect("preset should validate");
        assert_eq!(config.curriculum.len(), 24);
        assert_eq!(config.curriculum[1], vec!["1", "2", "3", "4", "5"]);
        assert_eq!(config.curriculum.last().unwrap(), &vec!["42".to_string()]);
        assert!(config.is_sequential("takeoath"));
        assert!(config.is_independent("MarriageA_F"));
        assert!(!config.is_independent("takeoath"));
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = SchedulerConfig::from_json_str(
            r#"{ "curriculum": [["0"], ["1", "2"]], "intent_limits": { "A": 2 } }"#,
        )
        .expect("schedule should parse");

        assert_eq!(config.curriculum.len(), 2);
        assert_eq!(config.limit_for("A"), 2);
        assert!(config.sequential_intents.is_empty());
        assert_eq!(config.follow_up_probability, DEFAULT_FOLLOW_UP_PROBABILITY);
    }

    #[test]
    fn test_validation_errors() {
        let err = SchedulerConfig::from_json_str(r#"{ "intent_limits": { "A": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroLimit(intent) if intent == "A"));

        let err = SchedulerConfig::from_json_str(r#"{ "curriculum": [["0"], []] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGroup(1)));

        let err =
            SchedulerConfig::from_json_str(r#"{ "curriculum": [["0", "1"], ["1"]] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateStage(stage) if stage == "1"));

        let err = SchedulerConfig::from_json_str(r#"{ "follow_up_probability": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProbability(_)));

        let nan = SchedulerConfig {
            follow_up_probability: f64::NAN,
            ..SchedulerConfig::default()
        };
        assert!(matches!(nan.validate(), Err(ConfigError::InvalidProbability(p)) if p.is_nan()));

        let err = SchedulerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sequential_intents": ["takeoath"] }}"#).unwrap();

        let config = SchedulerConfig::from_path(file.path()).unwrap();
        assert!(config.is_sequential("takeoath"));

        let missing = SchedulerConfig::from_path(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_, _))));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConfigError::EmptyGroup(3).to_string(),
            "Stage group 3 of the curriculum is empty"
        );
    }
}
