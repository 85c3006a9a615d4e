//! Retry Policy
//!
//! Governs client-side re-issue of a call whose send was rejected by the
//! transport. Only [`TransportError`]s are ever retried: once a response has
//! been decoded, including an error envelope, the call is over.
//!
//! ## Schedule
//!
//! - 11 attempts in total (1 initial + 10 retries) by default
//! - Retry `n` (0-based) waits `base_delay * 2^n`: 10ms, 20ms, 40ms, ...
//! - Sequential, no jitter. A waiting call only delays itself.
//!
//! ## Classification
//!
//! | `FailureKind` | Retried |
//! |---------------|---------|
//! | `Transient` | yes |
//! | `Permanent` | no |
//! | `Unclassified` | if the message contains a known transient phrase |

use crate::error::{FailureKind, TransportError};
use actor_config::{defaults, RetryConfig};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry decision and backoff schedule for one logical call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    transient_phrases: Vec<String>,
}

impl RetryPolicy {
    /// Create a policy with the default transient phrase set
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            transient_phrases: defaults::retry::TRANSIENT_PHRASES
                .iter()
                .map(|phrase| phrase.to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.base_delay_ms))
            .with_transient_phrases(config.transient_phrases.iter().cloned())
    }

    /// Single attempt, never retries
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Replace the phrases used for unclassified failures
    pub fn with_transient_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transient_phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Whether `error` belongs to the transient class
    pub fn is_transient(&self, error: &TransportError) -> bool {
        match error.kind {
            FailureKind::Transient => true,
            FailureKind::Permanent => false,
            FailureKind::Unclassified => {
                let text = error.to_string();
                self.transient_phrases
                    .iter()
                    .any(|phrase| text.contains(phrase.as_str()))
            }
        }
    }

    /// Whether a call that has made `attempts_made` attempts and just failed
    /// with `error` should be re-issued
    pub fn should_retry(&self, error: &TransportError, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts && self.is_transient(error)
    }

    /// Delay before retry `retry_index` (0-based)
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry_index))
    }

    /// Drive `operation` until it succeeds or the policy gives up
    ///
    /// `operation` receives the 1-based attempt number. The last error is
    /// returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, TransportError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) if self.should_retry(&error, attempt) => {
                    let delay = self.delay_for(attempt - 1);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient transport failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    if attempt > 1 || self.is_transient(&error) {
                        warn!(attempt, error = %error, "Giving up on call");
                    }
                    return Err(error);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            defaults::retry::MAX_ATTEMPTS,
            Duration::from_millis(defaults::retry::BASE_DELAY_MS),
        )
    }
}
