//! Error types for The One API calls.
//!
//! All failures are returned as values, never panicked or silently swallowed.
//! Heterogeneous failure causes (server error response, no response at all,
//! local error) are normalized into a uniform status/message view through
//! [`Error::status`] and [`Error::message`], while the enum itself keeps the
//! full detail for callers that want to match on the cause.

use http::StatusCode;
use std::time::Duration;

/// The main error type for The One API calls.
///
/// # Examples
///
/// ```no_run
/// use the_one_api::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("your-api-token")?;
///
/// match client.movies().await {
///     Ok(movies) => println!("{} movies", movies.docs.len()),
///     Err(Error::Api { status, message, .. }) => {
///         eprintln!("server rejected the request: {} {}", status, message);
///     }
///     Err(e) => eprintln!("request failed: {} ({})", e.message(), e.status()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection refused, DNS failure,
    /// timeout, connection dropped mid-response).
    ///
    /// The request never produced a usable HTTP response. These errors are
    /// transient and eligible for retry.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server returned a non-2xx HTTP status code.
    ///
    /// `message` holds the `message` field of the server's JSON error body
    /// when one was present, otherwise the raw body text.
    #[error("API error {status}: {message}")]
    Api {
        /// The HTTP status code.
        status: StatusCode,
        /// The server-supplied error message.
        message: String,
        /// The raw response body, for debugging.
        raw_response: String,
        /// Server-requested retry delay, parsed from a `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// A 2xx response body could not be deserialized into the expected type.
    ///
    /// Preserves the raw body alongside the serde message so the mismatch can
    /// be diagnosed from logs alone.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    Deserialization {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The raw response body that failed to deserialize.
        raw_response: String,
        /// The serde error message.
        serde_error: String,
    },

    /// The client was misconfigured.
    ///
    /// Covers the missing-token case as well as invalid builder input. This
    /// is a programming error on the caller's side; it is reported before
    /// any network I/O and never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An invalid base URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// All retry attempts were exhausted.
    ///
    /// Wraps the last transient error encountered before giving up.
    #[error("Retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Total number of attempts made, including the first.
        attempts: usize,
        /// The last error encountered.
        last_error: Box<Error>,
    },
}

impl Error {
    /// Returns `true` if this error is transient and worth retrying.
    ///
    /// Network failures, 5xx responses, and 429 (the API enforces a request
    /// quota) are retryable; 4xx responses, deserialization failures, and
    /// configuration errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            // reqwest builder errors are local bugs, not transport failures
            Error::Network(e) => !e.is_builder(),
            Error::Api { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// The normalized HTTP status for this failure.
    ///
    /// Server responses keep their own status; every failure that never
    /// produced a response maps to 500.
    ///
    /// # Examples
    ///
    /// ```
    /// use the_one_api::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::NOT_FOUND,
    ///     message: "not found".to_string(),
    ///     raw_response: r#"{"message":"not found"}"#.to_string(),
    ///     retry_after: None,
    /// };
    /// assert_eq!(err.status(), StatusCode::NOT_FOUND);
    /// ```
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Api { status, .. } => *status,
            Error::Deserialization { status, .. } => *status,
            Error::RetriesExhausted { last_error, .. } => last_error.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The normalized message for this failure.
    ///
    /// Classification, in priority order:
    /// 1. the server responded: the server's own message;
    /// 2. the request went out but nothing came back: a fixed
    ///    no-response message;
    /// 3. anything else local: the failure's own description.
    pub fn message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            Error::Network(e) if e.is_builder() => e.to_string(),
            Error::Network(_) => "No response received from the server".to_string(),
            Error::RetriesExhausted { last_error, .. } => last_error.message(),
            other => other.to_string(),
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Api { raw_response, .. } => Some(raw_response),
            Error::Deserialization { raw_response, .. } => Some(raw_response),
            Error::RetriesExhausted { last_error, .. } => last_error.raw_response(),
            _ => None,
        }
    }

    /// Returns the server-requested retry delay, if one was given.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::Api { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// A specialized `Result` type for The One API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: StatusCode, message: &str) -> Error {
        Error::Api {
            status,
            message: message.to_string(),
            raw_response: format!(r#"{{"message":"{}"}}"#, message),
            retry_after: None,
        }
    }

    #[test]
    fn server_response_keeps_status_and_message() {
        let err = api_error(StatusCode::NOT_FOUND, "not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "not found");
    }

    #[test]
    fn local_error_normalizes_to_500() {
        let err = Error::Configuration("api token is required".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Configuration error: api token is required");
    }

    #[test]
    fn exhausted_retries_delegate_to_last_error() {
        let err = Error::RetriesExhausted {
            attempts: 4,
            last_error: Box::new(api_error(StatusCode::SERVICE_UNAVAILABLE, "overloaded")),
        };
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message(), "overloaded");
        assert!(err.raw_response().is_some());
    }

    #[test]
    fn retryable_classification() {
        assert!(api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom").is_retryable());
        assert!(api_error(StatusCode::TOO_MANY_REQUESTS, "slow down").is_retryable());
        assert!(!api_error(StatusCode::BAD_REQUEST, "bad id").is_retryable());
        assert!(!Error::Configuration("api token is required".to_string()).is_retryable());
        assert!(!Error::Deserialization {
            status: StatusCode::OK,
            raw_response: "not json".to_string(),
            serde_error: "expected value".to_string(),
        }
        .is_retryable());
    }
}
