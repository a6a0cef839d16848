use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "doubao-seed-2-0-pro-260215";
pub const DEFAULT_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),
}

/// Process-level settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the reference documents (references/, templates/, examples/).
    pub skill_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            skill_dir: non_empty(lookup("DIRECTOR_SKILL_DIR"))
                .map(PathBuf::from)
                .unwrap_or_else(bundled_skill_dir),
            log_level: non_empty(lookup("DIRECTOR_LOG_LEVEL")).unwrap_or_else(|| "warn".to_string()),
        }
    }
}

/// Reference documents shipped alongside the crate.
pub fn bundled_skill_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("skill")
}

/// Connection settings for the chat completion endpoint.
///
/// Built once and handed to `ChatClient::new`; nothing downstream reads the
/// environment again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl ChatSettings {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `ARK_MODEL` wins over the older `ARK_MODEL_ENDPOINT` name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = non_empty(lookup("ARK_API_KEY")).ok_or(ConfigError::Missing("ARK_API_KEY"))?;
        let model = non_empty(lookup("ARK_MODEL"))
            .or_else(|| non_empty(lookup("ARK_MODEL_ENDPOINT")))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url =
            non_empty(lookup("ARK_BASE_URL")).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(api_key, model, base_url))
    }

    /// Applies command-line overrides on top of the environment values.
    pub fn with_overrides(
        mut self,
        model: Option<&str>,
        base_url: Option<&str>,
    ) -> Self {
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.model = model.to_string();
        }
        if let Some(base_url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = base_url.to_string();
        }
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let result = ChatSettings::from_lookup(lookup(&[("ARK_MODEL", "m")]));
        assert_eq!(result, Err(ConfigError::Missing("ARK_API_KEY")));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let result = ChatSettings::from_lookup(lookup(&[("ARK_API_KEY", "   ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let settings = ChatSettings::from_lookup(lookup(&[("ARK_API_KEY", "k")])).unwrap();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_model_endpoint_fallback() {
        let settings = ChatSettings::from_lookup(lookup(&[
            ("ARK_API_KEY", "k"),
            ("ARK_MODEL_ENDPOINT", "ep-123"),
        ]))
        .unwrap();
        assert_eq!(settings.model, "ep-123");

        let settings = ChatSettings::from_lookup(lookup(&[
            ("ARK_API_KEY", "k"),
            ("ARK_MODEL", "doubao-pro"),
            ("ARK_MODEL_ENDPOINT", "ep-123"),
        ]))
        .unwrap();
        assert_eq!(settings.model, "doubao-pro");
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let settings = ChatSettings::new("k", "a", "http://x")
            .with_overrides(Some(""), Some("http://y"));
        assert_eq!(settings.model, "a");
        assert_eq!(settings.base_url, "http://y");
    }

    #[test]
    fn test_two_configurations_coexist() {
        let first = ChatSettings::new("k1", "m1", "http://one");
        let second = ChatSettings::new("k2", "m2", "http://two");
        assert_ne!(first, second);
    }

    #[test]
    fn test_skill_dir_override() {
        let config = Config::from_lookup(lookup(&[("DIRECTOR_SKILL_DIR", "/tmp/skill")]));
        assert_eq!(config.skill_dir, PathBuf::from("/tmp/skill"));
        assert_eq!(config.log_level, "warn");

        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.skill_dir, bundled_skill_dir());
    }
}
