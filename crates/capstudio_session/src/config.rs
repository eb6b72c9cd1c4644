//! Session configuration.
//!
//! Pacing is cosmetic: it models realistic latency for the UI but none of
//! the session's ordering guarantees depend on it, so it is fully
//! configurable and zero in tests.

use std::time::Duration;

/// Tunable knobs for a workspace session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Delay applied while each file materializes
    pub file_delay: Duration,
    /// Delay between sub-steps of a simulated command
    pub step_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file_delay: Duration::from_millis(800),
            step_delay: Duration::from_millis(400),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// - `CAPSTUDIO_FILE_DELAY_MS`
    /// - `CAPSTUDIO_STEP_DELAY_MS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            file_delay: env_millis("CAPSTUDIO_FILE_DELAY_MS").unwrap_or(defaults.file_delay),
            step_delay: env_millis("CAPSTUDIO_STEP_DELAY_MS").unwrap_or(defaults.step_delay),
        }
    }

    /// Zero-delay configuration for tests.
    pub fn instant() -> Self {
        Self {
            file_delay: Duration::ZERO,
            step_delay: Duration::ZERO,
        }
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.file_delay, Duration::from_millis(800));
        assert_eq!(config.step_delay, Duration::from_millis(400));
    }

    #[test]
    fn test_instant_is_zero() {
        let config = SessionConfig::instant();
        assert!(config.file_delay.is_zero());
        assert!(config.step_delay.is_zero());
    }
}
