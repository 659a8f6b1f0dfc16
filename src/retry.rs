//! Retry policy for transient request failures.
//!
//! The policy is split the same way the client consumes it: a
//! [`RetryStrategy`] decides how long to wait before the next attempt, and a
//! [`RetryPredicate`] decides whether an error is worth another attempt at
//! all. Both are injected through the client builder, so callers can swap in
//! their own without touching the transport.
//!
//! Every request this crate makes is an idempotent GET, so retry eligibility
//! is purely a question of the error's cause.

use crate::Error;
use http::HeaderMap;
use rand::Rng;
use std::time::{Duration, SystemTime};

/// Upper bound on a server-requested `Retry-After` delay.
///
/// The API's quota window is short; anything larger than this is treated as
/// a misbehaving header rather than a wait worth honoring.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Defines how long to wait between retry attempts.
///
/// # Examples
///
/// ```
/// use the_one_api::RetryStrategy;
/// use std::time::Duration;
///
/// // No retries: surface the first failure immediately.
/// let none = RetryStrategy::None;
///
/// // Fixed delay: 500ms between each of up to 3 retries.
/// let fixed = RetryStrategy::Fixed {
///     delay: Duration::from_millis(500),
///     max_retries: 3,
/// };
///
/// // Exponential backoff: 200ms, 400ms, 800ms...
/// let backoff = RetryStrategy::ExponentialBackoff {
///     initial_delay: Duration::from_millis(200),
///     max_delay: Duration::from_secs(5),
///     max_retries: 3,
///     jitter: true,
/// };
/// ```
#[derive(Debug, Clone)]
pub enum RetryStrategy {
    /// Do not retry failed requests.
    None,

    /// Retry with a fixed delay between attempts.
    Fixed {
        /// The delay between retry attempts.
        delay: Duration,
        /// The maximum number of retry attempts.
        max_retries: usize,
    },

    /// Retry with exponentially increasing delays.
    ///
    /// Each retry waits `initial_delay * 2^(attempt - 1)`, capped at
    /// `max_delay`. Jitter scales the delay by a random factor in
    /// `[0.5, 1.0]` to avoid synchronized retries.
    ExponentialBackoff {
        /// The delay before the first retry.
        initial_delay: Duration,
        /// The maximum delay between retries.
        max_delay: Duration,
        /// The maximum number of retry attempts.
        max_retries: usize,
        /// Whether to randomize delays.
        jitter: bool,
    },
}

impl Default for RetryStrategy {
    /// Exponential backoff with 3 retries and jitter, starting at 200ms.
    fn default() -> Self {
        RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            max_retries: 3,
            jitter: true,
        }
    }
}

impl RetryStrategy {
    /// Returns the delay before the given retry attempt, or `None` once
    /// retries are exhausted.
    ///
    /// `attempt` is 1-indexed: 1 means the first retry (second request).
    pub fn delay_for_attempt(&self, attempt: usize) -> Option<Duration> {
        match self {
            RetryStrategy::None => None,
            RetryStrategy::Fixed { delay, max_retries } => {
                if attempt > *max_retries {
                    None
                } else {
                    Some(*delay)
                }
            }
            RetryStrategy::ExponentialBackoff {
                initial_delay,
                max_delay,
                max_retries,
                jitter,
            } => {
                if attempt > *max_retries {
                    return None;
                }

                let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1) as u32);
                let delay = initial_delay.saturating_mul(multiplier).min(*max_delay);

                if *jitter {
                    let factor = rand::thread_rng().gen_range(0.5..=1.0);
                    Some(delay.mul_f64(factor))
                } else {
                    Some(delay)
                }
            }
        }
    }

    /// Returns the maximum number of retries this strategy allows.
    pub fn max_retries(&self) -> usize {
        match self {
            RetryStrategy::None => 0,
            RetryStrategy::Fixed { max_retries, .. } => *max_retries,
            RetryStrategy::ExponentialBackoff { max_retries, .. } => *max_retries,
        }
    }
}

/// Decides whether a failed request should be attempted again.
///
/// # Examples
///
/// ```
/// use the_one_api::{Error, RetryPredicate};
///
/// struct RetryOnQuotaOnly;
///
/// impl RetryPredicate for RetryOnQuotaOnly {
///     fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
///         matches!(error, Error::Api { status, .. } if status.as_u16() == 429)
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Returns `true` if the request should be retried after `error`.
    ///
    /// `attempt` is the number of the attempt that just failed, 1-indexed.
    fn should_retry(&self, error: &Error, attempt: usize) -> bool;
}

/// Retry every transient failure: network errors, 5xx responses, and 429.
///
/// This is the default predicate and delegates to [`Error::is_retryable`].
#[derive(Debug, Clone, Copy)]
pub struct RetryOnTransient;

impl RetryPredicate for RetryOnTransient {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.is_retryable()
    }
}

/// Retry only on 5xx server errors.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnServerError;

impl RetryPredicate for RetryOnServerError {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::Api { status, .. } if status.is_server_error())
    }
}

/// Parses a `Retry-After` response header into a bounded delay.
///
/// Accepts both delta-seconds and HTTP-date forms; the result is capped at
/// [`MAX_RETRY_AFTER`]. Returns `None` when the header is absent or
/// unparseable.
pub(crate) fn retry_after_delay(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?;

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds).min(MAX_RETRY_AFTER));
    }

    let date = httpdate::parse_http_date(value).ok()?;
    let delay = date.duration_since(SystemTime::now()).ok()?;
    Some(delay.min(MAX_RETRY_AFTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn exponential_backoff_delays() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            max_retries: 4,
            jitter: false,
        };

        assert_eq!(
            strategy.delay_for_attempt(1),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            strategy.delay_for_attempt(2),
            Some(Duration::from_millis(400))
        );
        assert_eq!(
            strategy.delay_for_attempt(3),
            Some(Duration::from_millis(800))
        );
        assert_eq!(
            strategy.delay_for_attempt(4),
            Some(Duration::from_millis(1600))
        );
        assert_eq!(strategy.delay_for_attempt(5), None);
    }

    #[test]
    fn exponential_backoff_caps_at_max_delay() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(3),
            max_retries: 3,
            jitter: false,
        };

        assert_eq!(strategy.delay_for_attempt(2), Some(Duration::from_secs(3)));
    }

    #[test]
    fn fixed_delays() {
        let strategy = RetryStrategy::Fixed {
            delay: Duration::from_millis(500),
            max_retries: 2,
        };

        assert_eq!(
            strategy.delay_for_attempt(1),
            Some(Duration::from_millis(500))
        );
        assert_eq!(
            strategy.delay_for_attempt(2),
            Some(Duration::from_millis(500))
        );
        assert_eq!(strategy.delay_for_attempt(3), None);
    }

    #[test]
    fn no_retry() {
        assert_eq!(RetryStrategy::None.delay_for_attempt(1), None);
        assert_eq!(RetryStrategy::None.max_retries(), 0);
    }

    #[test]
    fn retry_after_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::RETRY_AFTER, HeaderValue::from_static("2"));

        assert_eq!(retry_after_delay(&headers), Some(Duration::from_secs(2)));
    }

    #[test]
    fn retry_after_capped() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::RETRY_AFTER, HeaderValue::from_static("600"));

        assert_eq!(retry_after_delay(&headers), Some(MAX_RETRY_AFTER));
    }

    #[test]
    fn retry_after_http_date() {
        let date = httpdate::fmt_http_date(SystemTime::now() + Duration::from_secs(30));
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::RETRY_AFTER,
            HeaderValue::from_str(&date).unwrap(),
        );

        let delay = retry_after_delay(&headers).unwrap();
        assert!(delay <= Duration::from_secs(30));
        assert!(delay >= Duration::from_secs(25));
    }

    #[test]
    fn retry_after_garbage_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::RETRY_AFTER,
            HeaderValue::from_static("soonish"),
        );

        assert_eq!(retry_after_delay(&headers), None);
        assert_eq!(retry_after_delay(&HeaderMap::new()), None);
    }
}
