//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{GiftmatchError, Result, constants};

/// Tuning knobs for the matching engine.
///
/// Every field has a default, so a config file only needs to name what it
/// overrides:
///
/// ```json
/// { "max_random_attempts": 10000 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Uniform permutations drawn before switching to the augmenting-path
    /// fallback. Zero skips the randomized tier entirely.
    pub max_random_attempts: u32,
    /// Wall-clock budget for one `assign` call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_random_attempts: constants::DEFAULT_MAX_RANDOM_ATTEMPTS,
            timeout_ms: constants::DEFAULT_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check that the values are within operating range.
    ///
    /// # Errors
    /// Returns [`GiftmatchError::Configuration`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.max_random_attempts > constants::MAX_RANDOM_ATTEMPTS_LIMIT {
            return Err(GiftmatchError::Configuration(format!(
                "max_random_attempts {} exceeds limit {}",
                self.max_random_attempts,
                constants::MAX_RANDOM_ATTEMPTS_LIMIT
            )));
        }
        if self.timeout_ms == 0 || self.timeout_ms > constants::MAX_TIMEOUT_MS {
            return Err(GiftmatchError::Configuration(format!(
                "timeout_ms must be in 1..={}, got {}",
                constants::MAX_TIMEOUT_MS,
                self.timeout_ms
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| GiftmatchError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
