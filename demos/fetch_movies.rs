//! Fetches the movie catalog and a page of quotes.
//!
//! Run with: `ONE_API_TOKEN=your-token cargo run --example fetch_movies`
//!
//! Get a token at <https://the-one-api.dev/sign-up>.

use the_one_api::{Client, Error, QuoteParams};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("the_one_api=debug,fetch_movies=info")
        .init();

    let token = std::env::var("ONE_API_TOKEN").expect("set ONE_API_TOKEN to your API token");
    let client = Client::new(token)?;

    println!("=== All movies ===");
    let movies = client.movies().await?;
    for movie in &movies.docs {
        println!(
            "{} ({} Academy Award wins)",
            movie.name,
            movie.academy_award_wins.unwrap_or(0)
        );
    }
    println!("{} movies total", movies.total);
    println!();

    println!("=== One movie by ID ===");
    match client.movie("5cd95395de30eff6ebccde5d").await? {
        Some(movie) => {
            println!("Found: {}", movie.name);

            println!();
            println!("=== Quotes, 5 per page ===");
            let quotes = client
                .movie_quotes(&movie.id, QuoteParams::default().limit(5))
                .await?;
            for quote in &quotes.docs {
                println!("  \"{}\"", quote.dialog);
            }
            println!(
                "page {} of {}",
                quotes.page.unwrap_or(1),
                quotes.pages.unwrap_or(1)
            );
        }
        None => println!("No movie with that ID"),
    }

    Ok(())
}
