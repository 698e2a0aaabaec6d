use allot_core::EngineConfig;
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "allot.toml";
const DEFAULT_LOG_FILTER: &str = "warn,allot=info";

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format '{other}', expected 'pretty' or 'json'"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::default(), filter: default_log_filter() }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AllotConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// File the configuration was read from; `None` when running on defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl AllotConfig {
    /// Load from `ALLOT_CONFIG_PATH` (default `allot.toml`) and apply `ALLOT_*` overrides
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Like [`AllotConfig::load`] with an injectable environment lookup
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let path = lookup("ALLOT_CONFIG_PATH").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let config = Self::from_file_or_default(Path::new(&path))?;
        let config = config.apply_overrides(&lookup)?;
        config.engine.validate().context("invalid engine configuration")?;
        Ok(config)
    }

    /// A missing file means built-in defaults; an unreadable or malformed one is an error
    pub fn from_file_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration file {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("parsing configuration file {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Environment overrides for cache, logging and scheduling
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        if let Some(value) = lookup("ALLOT_CACHE_ENABLED") {
            self.engine.cache.enabled = parse_flag("ALLOT_CACHE_ENABLED", &value)?;
        }
        if let Some(value) = lookup("ALLOT_CACHE_TTL_SECONDS") {
            self.engine.cache.ttl_seconds = value
                .trim()
                .parse()
                .with_context(|| format!("ALLOT_CACHE_TTL_SECONDS must be a whole number of seconds, got '{value}'"))?;
        }
        if let Some(value) = lookup("ALLOT_LOG_FORMAT") {
            self.logging.format = value.parse().context("ALLOT_LOG_FORMAT")?;
        }
        if let Some(value) = lookup("ALLOT_PARALLEL_MODELS") {
            self.engine.parallel_models = parse_flag("ALLOT_PARALLEL_MODELS", &value)?;
        }
        Ok(self)
    }
}

fn parse_flag(name: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{name} must be a boolean, got '{other}'"),
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use allot_core::AllotError;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AllotConfig::from_toml(
            r#"
            [engine.cache]
            ttl_seconds = 60

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.cache.ttl_seconds, 60);
        assert!(config.engine.cache.enabled);
        assert_eq!(config.engine.cache.max_entries, 1024);
        assert!(config.engine.parallel_models);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "warn,allot=info");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AllotConfig::load_with(env(&[(
            "ALLOT_CONFIG_PATH",
            "/definitely/not/here/allot.toml",
        )]))
        .unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.source.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = AllotConfig::default()
            .apply_overrides(env(&[
                ("ALLOT_CACHE_ENABLED", "false"),
                ("ALLOT_CACHE_TTL_SECONDS", "30"),
                ("ALLOT_LOG_FORMAT", "JSON"),
                ("ALLOT_PARALLEL_MODELS", "0"),
            ]))
            .unwrap();

        assert!(!config.engine.cache.enabled);
        assert_eq!(config.engine.cache.ttl_seconds, 30);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.engine.parallel_models);
    }

    #[test]
    fn test_malformed_values_are_errors() {
        assert!(AllotConfig::from_toml("[engine.cache]\nttl_seconds = \"soon\"").is_err());
        assert!(
            AllotConfig::default()
                .apply_overrides(env(&[("ALLOT_CACHE_TTL_SECONDS", "five")]))
                .is_err()
        );
        assert!(
            AllotConfig::default()
                .apply_overrides(env(&[("ALLOT_CACHE_ENABLED", "maybe")]))
                .is_err()
        );
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_zero_ttl_is_rejected_when_cache_enabled() {
        let err = AllotConfig::load_with(env(&[
            ("ALLOT_CONFIG_PATH", "/definitely/not/here/allot.toml"),
            ("ALLOT_CACHE_TTL_SECONDS", "0"),
        ]))
        .unwrap_err();
        match err.downcast_ref::<AllotError>() {
            Some(AllotError::Configuration { setting, .. }) => {
                assert_eq!(setting.as_deref(), Some("cache.ttl_seconds"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
