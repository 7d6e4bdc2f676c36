use std::time::Duration;

/// Largest backoff exponent; delays stop growing after 2^6 × base.
const MAX_RETRY_EXPONENT: u32 = 6;

/// How a single page request is bounded and retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound for one request, including reading the body.
    pub page_timeout: Duration,
    /// Retries after the first attempt. `0` disables retrying.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(30),
            max_retries: 4,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, retry_count: u32) -> Duration {
        calculate_retry_delay(self.base_delay, retry_count)
    }
}

/// Calculate the next retry delay based on retry count.
///
/// Uses exponential backoff: `base × 2^retry_count`.
pub fn calculate_retry_delay(base: Duration, retry_count: u32) -> Duration {
    base.saturating_mul(2u32.pow(retry_count.min(MAX_RETRY_EXPONENT)))
}
