//! Retry with exponential backoff
//!
//! [`retry_operation`] re-runs a fallible async operation until it succeeds or
//! the attempt budget is spent. After exhaustion the operation's own final
//! error is returned unchanged, so callers keep their error taxonomy.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
    /// Exponential backoff: initial_delay * base^attempt, capped at max_delay
    Exponential { initial_delay: Duration, base: f64, max_delay: Duration },
}

impl BackoffStrategy {
    /// Calculate the delay that follows the failed `attempt` (0-based).
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            BackoffStrategy::Fixed(delay) => *delay,
            BackoffStrategy::Exponential { initial_delay, base, max_delay } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let delay_ms = initial_delay.as_millis() as f64 * base.powi(exponent);
                let capped = delay_ms.min(max_delay.as_millis() as f64);
                Duration::from_millis(capped as u64)
            }
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total number of attempts (initial try included)
    pub max_retries: u32,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::exponential(3, Duration::from_secs(1))
    }
}

impl RetryConfig {
    /// `max_retries` attempts separated by `retry_delay * 2^attempt`.
    pub fn exponential(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            backoff: BackoffStrategy::Exponential {
                initial_delay: retry_delay,
                base: 2.0,
                max_delay: Duration::from_secs(300),
            },
        }
    }

    /// Create a configuration builder
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// Delay slept after the failed `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.calculate_delay(attempt)
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.config.max_retries = attempts;
        self
    }

    pub fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.config.backoff = BackoffStrategy::Fixed(delay);
        self
    }

    pub fn exponential_backoff(
        mut self,
        initial_delay: Duration,
        base: f64,
        max_delay: Duration,
    ) -> Self {
        self.config.backoff = BackoffStrategy::Exponential { initial_delay, base, max_delay };
        self
    }

    pub fn build(self) -> RetryConfig {
        self.config
    }
}

/// Run `operation` with up to `config.max_retries` attempts.
///
/// A `max_retries` of zero still performs one attempt. Between attempts the
/// task suspends on the tokio timer for [`RetryConfig::delay_for`]; nothing
/// is slept after the final failure.
pub async fn retry_operation<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    retry_operation_if(config, operation_name, |_: &E| true, operation).await
}

/// Like [`retry_operation`], but an error for which `should_retry` returns
/// false is returned at once without sleeping.
pub async fn retry_operation_if<F, Fut, T, E, P>(
    config: &RetryConfig,
    operation_name: &str,
    should_retry: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
    P: Fn(&E) -> bool,
{
    let attempts = config.max_retries.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(operation = operation_name, attempt = attempt + 1, "operation recovered");
                }
                return Ok(value);
            }
            Err(error) if !should_retry(&error) => {
                debug!(operation = operation_name, attempt = attempt + 1, error = %error, "error is not retryable");
                return Err(error);
            }
            Err(error) if attempt + 1 >= attempts => {
                warn!(
                    operation = operation_name,
                    attempts,
                    error = %error,
                    "operation failed after exhausting retries"
                );
                return Err(error);
            }
            Err(error) => {
                let delay = config.delay_for(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "operation failed, retrying"
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use tokio::time::Instant;

    use super::*;

    #[test]
    fn exponential_delay_doubles_from_retry_delay() {
        let config = RetryConfig::exponential(3, Duration::from_secs(1));
        assert_eq!(config.delay_for(0), Duration::from_secs(1));
        assert_eq!(config.delay_for(1), Duration::from_secs(2));
        assert_eq!(config.delay_for(2), Duration::from_secs(4));
    }

    #[test]
    fn exponential_delay_respects_cap() {
        let config = RetryConfig::builder()
            .exponential_backoff(Duration::from_secs(1), 2.0, Duration::from_secs(3))
            .build();
        assert_eq!(config.delay_for(5), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_with_backoff_sleeps() {
        let config = RetryConfig::exponential(3, Duration::from_secs(1));
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();
        let attempt_offsets = Arc::new(Mutex::new(Vec::new()));

        let result: Result<&str, String> = retry_operation(&config, "flaky", || {
            let calls = calls.clone();
            let attempt_offsets = attempt_offsets.clone();
            async move {
                attempt_offsets.lock().unwrap().push(started.elapsed());
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(format!("transient failure {n}"))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let offsets = attempt_offsets.lock().unwrap().clone();
        let tolerance = Duration::from_millis(50);
        assert!(offsets[0] < tolerance);
        assert!(offsets[1] >= Duration::from_secs(1) && offsets[1] < Duration::from_secs(1) + tolerance);
        assert!(offsets[2] >= Duration::from_secs(3) && offsets[2] < Duration::from_secs(3) + tolerance);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_final_error_unchanged_after_exhaustion() {
        let config = RetryConfig::exponential(3, Duration::from_millis(10));
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), String> = retry_operation(&config, "always-fails", || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Err(format!("failure {n}"))
            }
        })
        .await;

        assert_eq!(result, Err("failure 2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_stops_after_one_attempt() {
        let config = RetryConfig::exponential(5, Duration::from_secs(1));
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();

        let result: Result<(), String> = retry_operation_if(
            &config,
            "rejected",
            |err: &String| !err.starts_with("invalid"),
            || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("invalid input".to_string())
                }
            },
        )
        .await;

        assert_eq!(result, Err("invalid input".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn zero_retries_still_attempts_once() {
        let config = RetryConfig::builder().max_retries(0).build();
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<u32, String> = retry_operation(&config, "once", || {
            let calls = calls.clone();
            async move { Ok(calls.fetch_add(1, Ordering::SeqCst)) }
        })
        .await;

        assert_eq!(result, Ok(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
