//! Exponential backoff for startup operations such as the first database connection.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How often and how patiently to retry.
///
/// Delay before retry `n` (1-based) is `initial_delay * 2^(n-1)`, capped at `max_delay`.
/// With jitter each delay is scaled into `[50%, 100%]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryConfig {
    /// 5 retries from 250ms, capped at 8s: about 8 seconds of waiting in total.
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Un-jittered delay before the given retry (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Run `operation` until it succeeds or `config.max_retries` retries have failed.
///
/// ```ignore
/// use database::common::{RetryConfig, retry_with_backoff};
///
/// let client = retry_with_backoff(RetryConfig::new().with_max_retries(10), || {
///     database::mongodb::connect_from_config(&mongo_config)
/// })
/// .await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(config: RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retry = 0;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if retry > 0 {
                    debug!(retries = retry, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if retry >= config.max_retries {
            warn!(attempts = retry + 1, "Giving up: {}", err);
            return Err(err);
        }
        retry += 1;

        let mut delay = config.backoff(retry);
        if config.jitter {
            delay = jittered(delay);
        }
        warn!(
            retry,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            "Operation failed, retrying: {}",
            err
        );
        tokio::time::sleep(delay).await;
    }
}

/// Scale `delay` by a factor in `[0.5, 1.0]`.
fn jittered(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let percent = 50 + RandomState::new().hash_one(std::time::Instant::now()) % 51;
    delay * percent as u32 / 100
}
