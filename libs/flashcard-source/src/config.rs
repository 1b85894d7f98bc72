//! Application configuration from the environment or a JSON file.

use std::path::{Path, PathBuf};

use flashcard_core::{RetryPolicy, SessionConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_SOURCE: &str = "FLASHCARD_SOURCE";
pub const ENV_FILE_ROOT: &str = "FLASHCARD_FILE_ROOT";
pub const ENV_HTTP_TIMEOUT: &str = "FLASHCARD_HTTP_TIMEOUT_SECS";
pub const ENV_RETRY_POLICY: &str = "FLASHCARD_RETRY_POLICY";
pub const ENV_SIDE_INVERTED: &str = "FLASHCARD_SIDE_INVERTED";
pub const ENV_DECK_LIMIT: &str = "FLASHCARD_DECK_LIMIT";
pub const ENV_SEED: &str = "FLASHCARD_SEED";
pub const ENV_FRONT_LABELS: &str = "FLASHCARD_FRONT_LABELS";

/// Where to load the deck from and how to run sessions over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// File path or `http(s)://` URL of the deck text.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_root: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_timeout_secs: Option<u64>,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            file_root: None,
            http_timeout_secs: None,
            session: SessionConfig::default(),
        }
    }

    /// Load from process environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = lookup(ENV_SOURCE)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_SOURCE))?;
        let mut config = Self::new(source.trim());

        config.file_root = lookup(ENV_FILE_ROOT).map(PathBuf::from);
        if let Some(value) = lookup(ENV_HTTP_TIMEOUT) {
            config.http_timeout_secs = Some(parse_number(ENV_HTTP_TIMEOUT, &value)?);
        }

        let session = &mut config.session;
        if let Some(value) = lookup(ENV_RETRY_POLICY) {
            session.retry_policy = RetryPolicy::parse(&value)?;
        }
        if let Some(value) = lookup(ENV_SIDE_INVERTED) {
            session.side_inverted = parse_flag(ENV_SIDE_INVERTED, &value)?;
        }
        if let Some(value) = lookup(ENV_DECK_LIMIT) {
            session.deck_size_limit = SessionConfig::parse_deck_limit(&value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            session.shuffle_seed = Some(parse_number(ENV_SEED, &value)?);
        }
        if let Some(value) = lookup(ENV_FRONT_LABELS) {
            let labels: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect();
            if !labels.is_empty() {
                session.front_labels = labels;
            }
        }

        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::Invalid(flashcard_core::ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn source_is_required() {
        let result = AppConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(ConfigError::Missing(ENV_SOURCE))));
    }

    #[test]
    fn defaults_when_only_source_set() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_SOURCE, "decks/n5.csv")])).unwrap();
        assert_eq!(config, AppConfig::new("decks/n5.csv"));
    }

    #[test]
    fn reads_every_session_setting() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_SOURCE, "https://cdn.test/n5.csv"),
            (ENV_HTTP_TIMEOUT, "5"),
            (ENV_RETRY_POLICY, "preserve_order"),
            (ENV_SIDE_INVERTED, "yes"),
            (ENV_DECK_LIMIT, "quiz"),
            (ENV_SEED, "1234"),
            (ENV_FRONT_LABELS, "term, 表"),
        ]))
        .unwrap();
        assert_eq!(config.http_timeout_secs, Some(5));
        assert_eq!(config.session.retry_policy, RetryPolicy::PreserveOrder);
        assert!(config.session.side_inverted);
        assert_eq!(config.session.deck_size_limit, Some(10));
        assert_eq!(config.session.shuffle_seed, Some(1234));
        assert_eq!(config.session.front_labels, vec!["term".to_string(), "表".to_string()]);
    }

    #[test]
    fn rejects_malformed_values() {
        let result = AppConfig::from_lookup(lookup(&[(ENV_SOURCE, "x"), (ENV_SIDE_INVERTED, "maybe")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = AppConfig::from_lookup(lookup(&[(ENV_SOURCE, "x"), (ENV_RETRY_POLICY, "never")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(flashcard_core::ConfigError::InvalidRetryPolicy(_)))
        ));
    }

    #[test]
    fn reads_process_environment() {
        std::env::set_var(ENV_SOURCE, "env/n5.csv");
        std::env::set_var(ENV_DECK_LIMIT, "7");
        let config = AppConfig::from_env();
        std::env::remove_var(ENV_SOURCE);
        std::env::remove_var(ENV_DECK_LIMIT);

        let config = config.unwrap();
        assert_eq!(config.source, "env/n5.csv");
        assert_eq!(config.session.deck_size_limit, Some(7));
    }

    #[test]
    fn parses_json() {
        let config = AppConfig::from_json_str(
            r#"{"source":"n5.csv","session":{"retry_policy":"preserve_order","deck_size_limit":10}}"#,
        )
        .unwrap();
        assert_eq!(config.source, "n5.csv");
        assert_eq!(config.session.retry_policy, RetryPolicy::PreserveOrder);
        assert_eq!(config.session.deck_size_limit, Some(10));
        assert!(!config.session.side_inverted);

        assert!(matches!(
            AppConfig::from_json_str("{}"),
            Err(ConfigError::Json(_))
        ));
    }
}
