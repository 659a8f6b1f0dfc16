//! The One API client with retry logic and bearer-token authentication.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure one; every client is constructed with its API token, so a
//! request can never be issued unauthenticated.

use crate::{
    models::{Movie, Paged, Quote, QuoteParams},
    retry::{self, RetryOnTransient, RetryPredicate, RetryStrategy},
    Error, Result,
};
use http::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Production base URL for The One API.
///
/// The trailing slash matters: `Url::join` resolves relative to it.
const BASE_URL: &str = "https://the-one-api.dev/v2/";

/// A client for The One API.
///
/// The client is cheap to clone and designed to be reused across requests:
/// clones share one connection pool and one configuration. It is immutable
/// after construction, so concurrent calls from multiple tasks need no
/// coordination, and independently configured clients (different tokens,
/// different retry policies) can coexist freely.
///
/// # Examples
///
/// ```no_run
/// use the_one_api::{Client, QuoteParams};
///
/// # async fn example() -> Result<(), the_one_api::Error> {
/// let client = Client::new("your-api-token")?;
///
/// // All movies, with the server's pagination envelope intact.
/// let movies = client.movies().await?;
/// println!("{} movies total", movies.total);
///
/// // A single movie by ID.
/// if let Some(movie) = client.movie("5cd95395de30eff6ebccde5d").await? {
///     println!("{}", movie.name);
/// }
///
/// // Quotes from a movie, 50 per page.
/// let quotes = client
///     .movie_quotes("5cd95395de30eff6ebccde5d", QuoteParams::default().limit(50))
///     .await?;
/// for quote in &quotes.docs {
///     println!("{}", quote.dialog);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    api_token: String,
    retry_strategy: RetryStrategy,
    retry_predicate: Box<dyn RetryPredicate>,
    timeout: Option<Duration>,
}

/// Shape of the API's JSON error body.
#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

impl Client {
    /// Creates a client for the production API with the default retry
    /// policy.
    ///
    /// Equivalent to `Client::builder().api_token(token).build()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::builder().api_token(api_token).build()
    }

    /// Creates a new [`ClientBuilder`] for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Retrieves all movies.
    ///
    /// Issues `GET /movie` and returns the server's paged envelope
    /// unmodified.
    pub async fn movies(&self) -> Result<Paged<Movie>> {
        self.get_json("movie", &[]).await
    }

    /// Retrieves a single movie by its ID.
    ///
    /// Issues `GET /movie/{id}`. The server answers single-record lookups
    /// with a one-element list; this returns that element, or `None` when
    /// the list is empty (unknown but well-formed ID).
    pub async fn movie(&self, id: &str) -> Result<Option<Movie>> {
        let page: Paged<Movie> = self.get_json(&format!("movie/{}", id), &[]).await?;
        Ok(page.docs.into_iter().next())
    }

    /// Retrieves quotes from a movie.
    ///
    /// Issues `GET /movie/{id}/quote?limit=&page=`. Unset (or zero)
    /// parameters fall back to 10 results per page, page 1.
    pub async fn movie_quotes(&self, id: &str, params: QuoteParams) -> Result<Paged<Quote>> {
        let query = [
            ("limit", params.effective_limit().to_string()),
            ("page", params.effective_page().to_string()),
        ];
        self.get_json(&format!("movie/{}/quote", id), &query).await
    }

    /// Performs a GET request under the retry policy and deserializes the
    /// response.
    ///
    /// All endpoint operations funnel through here. A failed attempt is
    /// retried while the predicate approves and the strategy still has
    /// delays to offer; a `Retry-After` hint from the server overrides the
    /// computed delay for that attempt.
    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(path, query)?;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.execute_get(&url, attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            tracing::warn!(
                error = %error,
                attempt = attempt,
                url = %url,
                "Request failed"
            );

            if !self.inner.retry_predicate.should_retry(&error, attempt) {
                return Err(log_surfaced(error));
            }

            match self.inner.retry_strategy.delay_for_attempt(attempt) {
                Some(delay) => {
                    // The server knows its quota window better than we do.
                    let delay = error.retry_after().unwrap_or(delay);
                    tracing::info!(
                        delay_ms = delay.as_millis() as u64,
                        attempt = attempt,
                        "Retrying request after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
                None if attempt > 1 => {
                    return Err(log_surfaced(Error::RetriesExhausted {
                        attempts: attempt,
                        last_error: Box::new(error),
                    }));
                }
                None => return Err(log_surfaced(error)),
            }
        }
    }

    /// Executes a single request attempt.
    async fn execute_get<T>(&self, url: &Url, attempt: usize) -> Result<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(url = %url, attempt = attempt, "Executing HTTP request");

        let mut request = self
            .inner
            .http
            .get(url.clone())
            .bearer_auth(&self.inner.api_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        self.parse_response(response).await
    }

    /// Parses a response, normalizing non-2xx statuses into [`Error::Api`].
    async fn parse_response<T>(&self, response: reqwest::Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        tracing::info!(status = status.as_u16(), "Received HTTP response");

        if !status.is_success() {
            let retry_after = retry::retry_after_delay(response.headers());
            let raw_response = response.text().await.unwrap_or_default();

            // The API reports failures as {"message": "..."}; fall back to
            // the raw body for anything else.
            let message = serde_json::from_str::<ApiMessage>(&raw_response)
                .map(|body| body.message)
                .unwrap_or_else(|_| raw_response.clone());

            if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Client error (4xx)"
                );
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Server error (5xx)"
                );
            }

            return Err(Error::Api {
                status,
                message,
                raw_response,
                retry_after,
            });
        }

        let raw_body = response.text().await?;

        match serde_json::from_str::<T>(&raw_body) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to deserialize response"
                );

                Err(Error::Deserialization {
                    status,
                    raw_response: raw_body,
                    serde_error: e.to_string(),
                })
            }
        }
    }

    /// Builds the full URL for an endpoint path plus query parameters.
    fn endpoint_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.inner.base_url.join(path)?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

/// Logs an error with its normalized detail just before it is surfaced to
/// the caller.
fn log_surfaced(error: Error) -> Error {
    tracing::error!(
        error = %error,
        status = error.status().as_u16(),
        message = %error.message(),
        "Request failed permanently"
    );
    error
}

/// Builder for configuring and creating a [`Client`].
///
/// The API token is the only required input. The retry policy defaults to
/// exponential backoff with 3 retries on transient failures; pass
/// [`RetryStrategy::None`] to surface the first failure immediately.
///
/// # Examples
///
/// ```no_run
/// use the_one_api::{Client, RetryStrategy};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), the_one_api::Error> {
/// let client = Client::builder()
///     .api_token("your-api-token")
///     .timeout(Duration::from_secs(30))
///     .retry_strategy(RetryStrategy::Fixed {
///         delay: Duration::from_millis(500),
///         max_retries: 3,
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_token: Option<String>,
    base_url: Option<Url>,
    retry_strategy: RetryStrategy,
    retry_predicate: Option<Box<dyn RetryPredicate>>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            api_token: None,
            base_url: None,
            retry_strategy: RetryStrategy::default(),
            retry_predicate: None,
            timeout: None,
        }
    }

    /// Sets the bearer token sent with every request (required).
    ///
    /// Calling this again replaces the previous token; the last value wins.
    /// The token is not validated here in any way.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Overrides the base URL, e.g. to point at a local mock server in
    /// tests. Defaults to the production API.
    ///
    /// A missing trailing slash is repaired, since `Url::join` would
    /// otherwise drop the last path segment of the base.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let mut url = Url::parse(url.as_ref())?;
        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Sets the retry strategy for failed requests.
    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Sets a custom retry predicate.
    ///
    /// By default, requests are retried based on [`Error::is_retryable`].
    pub fn retry_predicate(mut self, predicate: Box<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Sets a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when no API token was provided or
    /// the HTTP client cannot be constructed. The failure happens here,
    /// before any request is issued.
    pub fn build(self) -> Result<Client> {
        let api_token = self
            .api_token
            .ok_or_else(|| Error::Configuration("api token is required".to_string()))?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(BASE_URL)?,
        };

        let mut headers = HeaderMap::new();
        headers.insert(http::header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let retry_predicate = self
            .retry_predicate
            .unwrap_or_else(|| Box::new(RetryOnTransient));

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                api_token,
                retry_strategy: self.retry_strategy,
                retry_predicate,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_token_fails() {
        let result = Client::builder().build();
        match result {
            Err(Error::Configuration(message)) => {
                assert_eq!(message, "api token is required");
            }
            _ => panic!("expected Configuration error"),
        }
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = Client::builder()
            .api_token("t")
            .base_url("http://localhost:8080/v2")
            .unwrap()
            .build()
            .unwrap();

        let url = client.endpoint_url("movie", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v2/movie");
    }

    #[test]
    fn endpoint_url_appends_query_pairs() {
        let client = Client::builder().api_token("t").build().unwrap();

        let query = [("limit", "10".to_string()), ("page", "1".to_string())];
        let url = client.endpoint_url("movie/abc/quote", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://the-one-api.dev/v2/movie/abc/quote?limit=10&page=1"
        );
    }
}
