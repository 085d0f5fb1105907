//! Retry with exponential backoff for transport failures

use std::time::Duration;

/// First retry delay
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);
/// Cap on any single delay
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(8);

/// How often and how long to back off before retrying a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles every retry
    pub base_delay: Duration,
    /// Upper bound on a single delay
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Policy with default delays
    pub const fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// Policy that never retries
    pub const fn none() -> Self {
        Self::new(0)
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_RETRIES)
    }
}
