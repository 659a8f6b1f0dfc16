//! Demonstrates the normalized error surface.
//!
//! Every failure, whatever its cause, exposes the same status/message view
//! through `Error::status()` and `Error::message()`, while the enum keeps
//! the full cause for callers that want to match on it.
//!
//! Run with: `cargo run --example error_handling`

use std::time::Duration;
use the_one_api::{Client, Error, RetryStrategy};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("the_one_api=debug,error_handling=info")
        .init();

    println!("=== Missing token ===");
    match Client::builder().build() {
        Ok(_) => println!("unexpectedly built a client"),
        Err(e) => println!("normalized: {} {}", e.status(), e.message()),
    }
    println!();

    println!("=== Invalid token (server rejects with 401) ===");
    let client = Client::builder()
        .api_token("definitely-not-a-token")
        .retry_strategy(RetryStrategy::None)
        .timeout(Duration::from_secs(10))
        .build()?;

    match client.movies().await {
        Ok(movies) => println!("unexpectedly got {} movies", movies.docs.len()),
        Err(Error::Api {
            status, message, ..
        }) => println!("server said: {} {}", status, message),
        Err(e) => println!("normalized: {} {}", e.status(), e.message()),
    }
    println!();

    println!("=== No response (nothing listening) ===");
    let unreachable = Client::builder()
        .api_token("any")
        .base_url("http://127.0.0.1:1")?
        .retry_strategy(RetryStrategy::None)
        .build()?;

    match unreachable.movies().await {
        Ok(_) => println!("unexpected success"),
        Err(e) => {
            // "No response received from the server", status 500
            println!("normalized: {} {}", e.status(), e.message());
        }
    }

    Ok(())
}
