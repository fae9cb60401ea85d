// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer configuration.

use crate::sequencer::SequencerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default delay between highlighted nodes
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Configuration for a [`HighlightSequencer`](crate::HighlightSequencer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Delay between ticks in milliseconds; must be positive
    pub delay_ms: u64,
}

impl SequencerConfig {
    /// Create a config with the given tick delay
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Tick delay as a duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Check that the config can drive a run
    pub fn validate(&self) -> Result<(), SequencerError> {
        if self.delay_ms == 0 {
            return Err(SequencerError::InvalidDelay(self.delay_ms));
        }
        Ok(())
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SequencerConfig::default();
        assert_eq!(config.delay(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_delay_rejected() {
        assert!(SequencerConfig { delay_ms: 0 }.validate().is_err());
        // Sub-millisecond delays round down to zero.
        let config = SequencerConfig::with_delay(Duration::from_micros(300));
        assert!(matches!(config.validate(), Err(SequencerError::InvalidDelay(0))));
    }

    #[test]
    fn test_serialization() {
        let config = SequencerConfig::with_delay(Duration::from_millis(120));
        let text = ron::to_string(&config).unwrap();
        let loaded: SequencerConfig = ron::from_str(&text).unwrap();
        assert_eq!(loaded, config);

        let defaulted: SequencerConfig = ron::from_str("()").unwrap();
        assert_eq!(defaulted, SequencerConfig::default());
    }
}
