//! Bounded, fixed-delay retry policy for database initialization

use std::time::Duration;

use crate::config::SchemaConfig;

/// Retry policy: a fixed number of attempts separated by a constant delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up
    pub max_attempts: u32,
    /// Delay after each failed attempt
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

impl From<&SchemaConfig> for RetryPolicy {
    fn from(config: &SchemaConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_secs(config.retry_delay_seconds),
        }
    }
}

impl RetryPolicy {
    /// Start a fresh countdown for this policy
    pub fn countdown(&self) -> RetryCountdown {
        RetryCountdown {
            remaining: self.max_attempts,
            delay: self.delay,
        }
    }
}

/// Remaining-attempts counter driven by the initializer loop
#[derive(Debug)]
pub struct RetryCountdown {
    remaining: u32,
    delay: Duration,
}

impl RetryCountdown {
    /// Attempts left, including the one about to run
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether another attempt may run
    pub fn has_attempts(&self) -> bool {
        self.remaining > 0
    }

    /// Record a failed attempt and return the delay to wait before the next one
    pub fn record_failure(&mut self) -> Duration {
        self.remaining = self.remaining.saturating_sub(1);
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }

    #[test]
    fn test_countdown_exhausts() {
        let policy = RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(250),
        };
        let mut countdown = policy.countdown();

        let mut failures = 0;
        while countdown.has_attempts() {
            let delay = countdown.record_failure();
            assert_eq!(delay, Duration::from_millis(250));
            failures += 1;
        }

        assert_eq!(failures, 3);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn test_countdown_never_underflows() {
        let mut countdown = RetryPolicy {
            max_attempts: 0,
            delay: Duration::ZERO,
        }
        .countdown();
        assert!(!countdown.has_attempts());
        countdown.record_failure();
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn test_from_schema_config() {
        let config = SchemaConfig {
            max_attempts: 7,
            retry_delay_seconds: 2,
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }
}
