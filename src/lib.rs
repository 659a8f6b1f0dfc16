//! # the-one-api - A client library for The One API
//!
//! This crate wraps [The One API](https://the-one-api.dev), the Lord of the
//! Rings data service, exposing its movie and quote endpoints as typed async
//! operations. Authentication uses the API's bearer token; transient
//! failures are retried under a configurable policy; every failure is
//! normalized into a uniform status/message view.
//!
//! ## Quick Start
//!
//! ```no_run
//! use the_one_api::{Client, QuoteParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), the_one_api::Error> {
//!     // The token is required at construction; requests can never go out
//!     // unauthenticated.
//!     let client = Client::new("your-api-token")?;
//!
//!     let movies = client.movies().await?;
//!     for movie in &movies.docs {
//!         println!("{}", movie.name);
//!     }
//!
//!     let movie = client.movie("5cd95395de30eff6ebccde5d").await?;
//!     if let Some(movie) = movie {
//!         let quotes = client
//!             .movie_quotes(&movie.id, QuoteParams::default().limit(50))
//!             .await?;
//!         println!("{} of {} quotes", quotes.docs.len(), quotes.total);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, Error>`; nothing is thrown or panicked.
//! Whatever the cause, [`Error::status`] and [`Error::message`] give the
//! same normalized view the API's consumers have always worked with:
//! a server response keeps its own status and message, while anything that
//! never produced a response maps to 500.
//!
//! ```no_run
//! use the_one_api::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::new("your-api-token")?;
//! match client.movie("not-a-real-id").await {
//!     Ok(Some(movie)) => println!("found {}", movie.name),
//!     Ok(None) => println!("no such movie"),
//!     Err(e) => eprintln!("lookup failed: {} {}", e.status(), e.message()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Retries
//!
//! Transient failures (network errors, 5xx, 429) are retried with
//! exponential backoff, three times by default. The policy is injected, not
//! global - configure it per client:
//!
//! ```no_run
//! use the_one_api::{Client, RetryStrategy};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), the_one_api::Error> {
//! let client = Client::builder()
//!     .api_token("your-api-token")
//!     .retry_strategy(RetryStrategy::Fixed {
//!         delay: Duration::from_millis(500),
//!         max_retries: 3,
//!     })
//!     .build()?;
//!
//! // Or no retries at all:
//! let impatient = Client::builder()
//!     .api_token("your-api-token")
//!     .retry_strategy(RetryStrategy::None)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod models;
pub mod retry;

pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use models::{Movie, Paged, Quote, QuoteParams};
pub use retry::{RetryPredicate, RetryStrategy};
