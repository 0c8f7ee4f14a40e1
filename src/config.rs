use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::loader::ColumnLayout;
use crate::progress::SkipPolicy;

const APP_DIR: &str = "quiz_session";
const CONFIG_FILE: &str = "userconfig.json";
const MAX_HISTORY: usize = 10;

/// One question per screen with a check button, or every question on a
/// single form with one submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnswerMode {
    #[default]
    Stepwise,
    Form,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub quiz_folder: PathBuf,
    /// `(path, unix timestamp)`, most recent first.
    pub file_history: Vec<(String, i64)>,
    pub columns: ColumnLayout,
    pub skip_policy: SkipPolicy,
    pub answer_mode: AnswerMode,
    pub log_level: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            quiz_folder: PathBuf::from("."),
            file_history: Vec::new(),
            columns: ColumnLayout::default(),
            skip_policy: SkipPolicy::default(),
            answer_mode: AnswerMode::default(),
            log_level: "info".to_string(),
        }
    }
}

impl UserConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Directory for the log file, falling back to the working directory.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Reads the stored config. `Ok(None)` when no config has been saved yet.
    pub fn try_load() -> Result<Option<Self>, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Parses a stored config; absent fields take their defaults.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn update_file_history(&mut self, filename: String) {
        let timestamp = chrono::Utc::now().timestamp();
        self.file_history.retain(|(f, _)| f != &filename);
        self.file_history.insert(0, (filename, timestamp));
        self.file_history.truncate(MAX_HISTORY);
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_deduplicated_and_capped() {
        let mut config = UserConfig::default();
        for i in 0..12 {
            config.update_file_history(format!("quiz{}.csv", i));
        }
        config.update_file_history("quiz5.csv".to_string());

        assert_eq!(config.file_history.len(), MAX_HISTORY);
        assert_eq!(config.file_history[0].0, "quiz5.csv");
        assert_eq!(
            config.file_history.iter().filter(|(f, _)| f == "quiz5.csv").count(),
            1
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            UserConfig::parse(r#"{ "answer_mode": "Form", "skip_policy": "ExcludeFromTotal" }"#).unwrap();
        assert_eq!(config.answer_mode, AnswerMode::Form);
        assert_eq!(config.skip_policy, SkipPolicy::ExcludeFromTotal);
        assert_eq!(config.columns, ColumnLayout::default());
        assert_eq!(config.quiz_folder, PathBuf::from("."));
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(UserConfig::parse("not json"), Err(ConfigError::Json(_))));
        assert_eq!(UserConfig::parse("{}").unwrap(), UserConfig::default());
    }

    #[test]
    fn log_level_parsing() {
        let mut config = UserConfig::default();
        config.log_level = "debug".into();
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
        config.log_level = "loud".into();
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }
}
