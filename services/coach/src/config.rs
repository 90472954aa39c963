use interview_core::config::{ConfigError as ScheduleError, SchedulerConfig};
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Path or http(s) URL of the question file.
    pub questions: String,
    /// JSON schedule; the built-in N-400 schedule is used when absent.
    pub schedule_path: Option<PathBuf>,
    /// Seed for reproducible sessions.
    pub seed: Option<u64>,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let questions =
            std::env::var("COACH_QUESTIONS").unwrap_or_else(|_| "n400_new.csv".to_string());

        let schedule_path = std::env::var("COACH_SCHEDULE").ok().map(PathBuf::from);

        let seed = match std::env::var("COACH_SEED") {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("COACH_SEED".to_string(), e.to_string())
            })?),
            Err(_) => None,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            questions,
            schedule_path,
            seed,
            log_level,
        })
    }

    /// Applies command-line values on top of the environment. Each `Some`
    /// replaces the corresponding setting; `None` keeps what was loaded.
    pub fn with_overrides(
        mut self,
        questions: Option<String>,
        schedule_path: Option<PathBuf>,
        seed: Option<u64>,
    ) -> Self {
        if let Some(questions) = questions {
            self.questions = questions;
        }
        if let Some(schedule_path) = schedule_path {
            self.schedule_path = Some(schedule_path);
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Loads the scheduler tuning this configuration points at.
    pub fn scheduler_config(&self) -> Result<SchedulerConfig, ScheduleError> {
        match &self.schedule_path {
            Some(path) => SchedulerConfig::from_path(path),
            None => Ok(SchedulerConfig::n400()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("COACH_QUESTIONS");
            env::remove_var("COACH_SCHEDULE");
            env::remove_var("COACH_SEED");
            env::remove_var("RUST_LOG");
        }
    }

    #[test]
    fn test_config_error_display() {
        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.questions, "n400_new.csv");
        assert_eq!(config.schedule_path, None);
        assert_eq!(config.seed, None);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.scheduler_config().unwrap(), SchedulerConfig::n400());
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("COACH_QUESTIONS", "https://example.com/deck.csv");
            env::set_var("COACH_SCHEDULE", "/custom/schedule.json");
            env::set_var("COACH_SEED", "1234");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.questions, "https://example.com/deck.csv");
        assert_eq!(
            config.schedule_path,
            Some(PathBuf::from("/custom/schedule.json"))
        );
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_config_invalid_seed() {
        clear_env_vars();
        unsafe {
            env::set_var("COACH_SEED", "not-a-number");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "COACH_SEED"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_command_line_overrides_environment() {
        clear_env_vars();
        unsafe {
            env::set_var("COACH_QUESTIONS", "env_deck.csv");
            env::set_var("COACH_SCHEDULE", "/env/schedule.json");
            env::set_var("COACH_SEED", "5");
        }

        let config = Config::from_env().unwrap().with_overrides(
            Some("flag_deck.csv".to_string()),
            None,
            Some(99),
        );

        assert_eq!(config.questions, "flag_deck.csv");
        assert_eq!(config.schedule_path, Some(PathBuf::from("/env/schedule.json")));
        assert_eq!(config.seed, Some(99));

        let untouched = Config::from_env().unwrap().with_overrides(None, None, None);
        assert_eq!(untouched.questions, "env_deck.csv");
        assert_eq!(untouched.seed, Some(5));
    }

    #[test]
    #[serial]
    fn test_schedule_file_is_loaded() {
        clear_env_vars();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "curriculum": [["0"]], "follow_up_probability": 0.0 }}"#).unwrap();
        unsafe {
            env::set_var("COACH_SCHEDULE", file.path());
        }

        let config = Config::from_env().unwrap();
        let schedule = config.scheduler_config().unwrap();
        assert_eq!(schedule.curriculum, vec![vec!["0".to_string()]]);
        assert_eq!(schedule.follow_up_probability, 0.0);
    }
}
