use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{AUTOPLAY_MAX_ATTEMPTS, AUTOPLAY_STEP_DELAY_MS};

/// Load retry policy handed to the streaming engine.
///
/// Fragment and manifest loads each get their own instance: a failing manifest is far
/// more likely to be fatal than a single failing segment, so it gets fewer retries and
/// shorter caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Maximum number of retries (not counting the initial attempt)
    pub max_retries: u32,
    /// Delay before the first retry
    pub retry_delay_ms: u64,
    /// Cap on the engine's exponential retry delay
    pub max_retry_delay_ms: u64,
    /// Per-attempt load timeout
    pub timeout_ms: u64,
}

impl BackoffPolicy {
    pub fn fragment() -> Self {
        Self {
            max_retries: 6,
            retry_delay_ms: 1_000,
            max_retry_delay_ms: 8_000,
            timeout_ms: 20_000,
        }
    }

    pub fn manifest() -> Self {
        Self {
            max_retries: 2,
            retry_delay_ms: 500,
            max_retry_delay_ms: 2_000,
            timeout_ms: 10_000,
        }
    }
}

/// Bounded autoplay retry with linearly increasing delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoplayPolicy {
    /// Total number of play() attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay unit; retry `n` waits `n * step_delay_ms`
    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,
}

impl Default for AutoplayPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            step_delay_ms: default_step_delay(),
        }
    }
}

impl AutoplayPolicy {
    /// Delay to wait after the failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.step_delay_ms.saturating_mul(attempt as u64))
    }
}

fn default_max_attempts() -> u32 {
    AUTOPLAY_MAX_ATTEMPTS
}

fn default_step_delay() -> u64 {
    AUTOPLAY_STEP_DELAY_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_policy_is_tighter_than_fragment() {
        let fragment = BackoffPolicy::fragment();
        let manifest = BackoffPolicy::manifest();

        assert!(manifest.max_retries < fragment.max_retries);
        assert!(manifest.max_retry_delay_ms < fragment.max_retry_delay_ms);
        assert!(manifest.timeout_ms < fragment.timeout_ms);
        for policy in [&fragment, &manifest] {
            assert!(policy.retry_delay_ms <= policy.max_retry_delay_ms);
        }
    }

    #[test]
    fn test_backoff_policy_reads_from_toml() {
        let policy: BackoffPolicy = toml::from_str(
            "max_retries = 3\nretry_delay_ms = 250\nmax_retry_delay_ms = 4000\ntimeout_ms = 15000\n",
        )
        .unwrap();

        assert_eq!(
            policy,
            BackoffPolicy {
                max_retries: 3,
                retry_delay_ms: 250,
                max_retry_delay_ms: 4_000,
                timeout_ms: 15_000,
            }
        );
    }

    #[test]
    fn test_autoplay_delay_is_linear() {
        let policy = AutoplayPolicy::default();

        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay_after(1), Duration::from_millis(300));
        assert_eq!(policy.delay_after(2), Duration::from_millis(600));
        assert_eq!(policy.delay_after(4), Duration::from_millis(1_200));
    }
}
