//! Player configuration.

use crate::error::{PlaybackError, PlaybackResult};
use serde::{Deserialize, Serialize};

/// Default number of records that may be in flight at once
pub const DEFAULT_SLOT_CAPACITY: usize = 6;

/// Default limit on the recorder command line embedded in the header
pub const DEFAULT_MAX_CMDLINE_LEN: usize = 2048;

/// Player configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Compare live arguments against recorded arguments
    pub strict_checks: bool,
    /// Maximum in-flight call records (call-tree nesting depth)
    pub slot_capacity: usize,
    /// Maximum length of the recorder command line in bytes
    pub max_cmdline_len: usize,
}

impl PlayerConfig {
    /// Create a strict config with default limits
    #[must_use]
    pub fn new() -> Self {
        Self {
            strict_checks: true,
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            max_cmdline_len: DEFAULT_MAX_CMDLINE_LEN,
        }
    }

    /// Create a config that skips argument comparison
    #[must_use]
    pub fn relaxed() -> Self {
        Self::new().with_strict_checks(false)
    }

    /// Set strict checks
    #[must_use]
    pub fn with_strict_checks(mut self, strict: bool) -> Self {
        self.strict_checks = strict;
        self
    }

    /// Set slot capacity
    #[must_use]
    pub fn with_slot_capacity(mut self, capacity: usize) -> Self {
        self.slot_capacity = capacity;
        self
    }

    /// Set command line limit
    #[must_use]
    pub fn with_max_cmdline_len(mut self, len: usize) -> Self {
        self.max_cmdline_len = len;
        self
    }

    /// Check the config can drive a player
    ///
    /// # Errors
    ///
    /// Returns error if the slot capacity cannot hold a single call
    pub fn validate(&self) -> PlaybackResult<()> {
        // a prologue and its epilogue are in flight together
        if self.slot_capacity < 2 {
            return Err(PlaybackError::InvalidConfig {
                reason: format!(
                    "slot capacity {} cannot hold a prologue/epilogue pair",
                    self.slot_capacity
                ),
            });
        }
        Ok(())
    }

    /// Serialize to JSON
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialize from JSON
    ///
    /// # Errors
    ///
    /// Returns error if deserialization or validation fails
    pub fn from_json(json: &str) -> PlaybackResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PlayerConfig::default();
        assert!(config.strict_checks);
        assert_eq!(config.slot_capacity, DEFAULT_SLOT_CAPACITY);
        assert_eq!(config.max_cmdline_len, 2048);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_relaxed() {
        assert!(!PlayerConfig::relaxed().strict_checks);
    }

    #[test]
    fn test_config_builders() {
        let config = PlayerConfig::new()
            .with_slot_capacity(10)
            .with_max_cmdline_len(16)
            .with_strict_checks(false);
        assert_eq!(config.slot_capacity, 10);
        assert_eq!(config.max_cmdline_len, 16);
        assert!(!config.strict_checks);
    }

    #[test]
    fn test_config_rejects_tiny_pool() {
        let err = PlayerConfig::new().with_slot_capacity(1).validate().unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidConfig { .. }));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = PlayerConfig::relaxed().with_slot_capacity(8);
        let restored = PlayerConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_config_json_partial_uses_defaults() {
        let config = PlayerConfig::from_json(r#"{ "strict_checks": false }"#).unwrap();
        assert!(!config.strict_checks);
        assert_eq!(config.slot_capacity, DEFAULT_SLOT_CAPACITY);
    }

    #[test]
    fn test_config_json_invalid() {
        assert!(PlayerConfig::from_json("not json").is_err());
        assert!(PlayerConfig::from_json(r#"{ "slot_capacity": 0 }"#).is_err());
    }
}
