//! Engine configuration
//!
//! Every field has a default so that a partial TOML table (or none at all)
//! produces a working engine.

use crate::constants::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECONDS};
use crate::error::{AllotError, AllotResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    /// Score models on the rayon pool instead of one after another
    #[serde(default = "default_true")]
    pub parallel_models: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { cache: CacheConfig::default(), parallel_models: true }
    }
}

impl EngineConfig {
    /// Reject settings that cannot describe a working cache
    pub fn validate(&self) -> AllotResult<()> {
        if self.cache.enabled && self.cache.ttl_seconds == 0 {
            return Err(AllotError::configuration(
                "cache.ttl_seconds",
                "must be greater than zero when the cache is enabled",
            ));
        }
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(AllotError::configuration(
                "cache.max_entries",
                "must be greater than zero when the cache is enabled",
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_zero_ttl_rejected_only_when_enabled() {
        let mut config = EngineConfig::default();
        config.cache.ttl_seconds = 0;
        assert!(config.validate().is_err());

        config.cache.enabled = false;
        assert!(config.validate().is_ok());
    }
}
