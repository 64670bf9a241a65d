//! Collaborator configuration, read from the environment

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the language model collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Base URL of an `OpenAI`-compatible API, without the endpoint path
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Upper bound for one completion call
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_empty("OPENAI_API_KEY"),
            base_url: non_empty("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: non_empty("CONVO_MODEL").unwrap_or(defaults.model),
            temperature: non_empty("CONVO_TEMPERATURE")
                .and_then(|v| parse_or_warn("CONVO_TEMPERATURE", &v)),
            max_tokens: non_empty("CONVO_MAX_TOKENS")
                .and_then(|v| parse_or_warn("CONVO_MAX_TOKENS", &v)),
            timeout: non_empty("CONVO_LLM_TIMEOUT_SECS")
                .and_then(|v| parse_or_warn::<u64>("CONVO_LLM_TIMEOUT_SECS", &v))
                .filter(|&secs| {
                    if secs == 0 {
                        tracing::warn!(
                            key = "CONVO_LLM_TIMEOUT_SECS",
                            "Ignoring zero timeout, every request would fail"
                        );
                    }
                    secs > 0
                })
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value, "Ignoring unparseable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> LlmConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        LlmConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config, LlmConfig::default());
        assert!(!config.has_api_key());
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_reads_all_values() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
            ("CONVO_MODEL", "gpt-4o"),
            ("CONVO_TEMPERATURE", "0.7"),
            ("CONVO_MAX_TOKENS", "256"),
            ("CONVO_LLM_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(256));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_api_key_is_absent() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = config_from(&[
            ("CONVO_TEMPERATURE", "warm"),
            ("CONVO_MAX_TOKENS", "-3"),
            ("CONVO_LLM_TIMEOUT_SECS", "soon"),
        ]);
        assert_eq!(config.temperature, None);
        assert_eq!(config.max_tokens, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let config = config_from(&[("CONVO_LLM_TIMEOUT_SECS", "0")]);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);

        let config = config_from(&[("CONVO_LLM_TIMEOUT_SECS", "1")]);
        assert_eq!(config.timeout, Duration::from_secs(1));
    }
}
