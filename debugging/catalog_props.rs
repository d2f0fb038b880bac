//! Query the live catalog and print what the homepage would receive.
//! Usage:
//!   cargo run --bin catalog_props -- category <trending|popular|top_rated|action|comedy>
//!   cargo run --bin catalog_props -- search <query>
//!   cargo run --bin catalog_props -- trailer <movie_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use std::env;
use streamboard::catalog::{select_trailer, CatalogApi, CatalogClient};
use streamboard::config::Settings;
use streamboard::models::{Category, MediaItem};
use tracing::info;
use tracing_subscriber::EnvFilter;

enum Command {
    Category(Category),
    Search(String),
    Trailer(i64),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_args() -> Result<Command> {
    let mut args = env::args().skip(1);
    let kind = args.next().context("missing command (category|search|trailer)")?;
    let value = args.collect::<Vec<_>>().join(" ");
    match kind.as_str() {
        "category" => Ok(Command::Category(value.parse()?)),
        "search" if !value.trim().is_empty() => Ok(Command::Search(value)),
        "trailer" => Ok(Command::Trailer(
            value.trim().parse().context("movie id must be a number")?,
        )),
        _ => Err(anyhow!("usage: catalog_props <category|search|trailer> <value>")),
    }
}

fn print_items(items: &[MediaItem]) {
    info!("{} items", items.len());
    for item in items {
        info!(
            "{:>8} | {} | {} | rating {:?} | poster {:?}",
            item.id,
            item.display_title(),
            item.year().unwrap_or_else(|| "----".to_string()),
            item.vote_average,
            item.poster_path
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    init_tracing();

    let command = parse_args()?;
    let settings = Settings::from_env()?;
    let client = CatalogClient::from_settings(&settings)?;

    match command {
        Command::Category(category) => {
            info!("Fetching {} ({})", category.label(), category.endpoint());
            print_items(&client.fetch_list(category.endpoint()).await?);
        }
        Command::Search(query) => {
            info!("Searching for '{}'", query);
            print_items(&client.search_movies(&query).await?);
        }
        Command::Trailer(id) => {
            let videos = client.fetch_videos(id).await?;
            for v in &videos {
                info!("{} | {} | {}", v.site, v.video_type, v.key);
            }
            match select_trailer(&videos) {
                Some(t) => info!("Selected trailer: {}", t.key()),
                None => info!("No YouTube trailer; homepage would use the placeholder"),
            }
        }
    }
    Ok(())
}
