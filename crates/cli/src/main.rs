//! dinesafe command-line entry point.
//!
//! Thin consumer over the dataset service: refresh the dataset, search it,
//! or report cache status. Logging goes to stderr so stdout stays clean
//! for command output.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dinesafe_client::{FetchClient, FetchConfig};
use dinesafe_core::{
    AppConfig, CacheStore, DatasetOrigin, DatasetService, model, search,
};

#[derive(Parser)]
#[command(name = "dinesafe", about = "NYC restaurant inspection dataset service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the current dataset, refreshing from the network if the cache
    /// is stale, and print a summary.
    Refresh,
    /// Search establishments by name or address.
    Search {
        query: String,
        /// Restrict results to inspections from one year.
        #[arg(long)]
        year: Option<i32>,
    },
    /// Print cache metadata.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    tracing::info!(cache_dir = %config.cache_dir.display(), "configuration loaded");
    let cache = CacheStore::new(&config.cache_dir);

    match cli.command {
        Command::Refresh => {
            let service = build_service(&config, cache)?;
            let snapshot = service.get_dataset().await;
            print_summary(&snapshot);
        }
        Command::Search { query, year } => {
            let service = build_service(&config, cache)?;
            let snapshot = service.get_dataset().await;
            if snapshot.origin == DatasetOrigin::Unavailable {
                println!("No inspection data available; try again later.");
                return Ok(());
            }

            let dataset = match year {
                Some(y) => search::filter_by_year(&snapshot.dataset, y),
                None => snapshot.dataset,
            };
            let results = search::search(&dataset, &query);
            if results.is_empty() {
                println!("No restaurants found matching {:?}.", query);
                return Ok(());
            }

            println!("Found {} matching restaurants:", results.len());
            for rec in &results {
                let grade = if rec.grade.is_empty() {
                    model::grade_for_score(rec.score)
                } else {
                    rec.grade.as_str()
                };
                let date = rec
                    .inspection_date
                    .map(|d| d.date().to_string())
                    .unwrap_or_else(|| "unknown date".to_string());
                println!(
                    "{} - {} {} ({}) - grade {} score {} inspected {}",
                    rec.dba, rec.building, rec.street, rec.boro, grade, rec.score, date
                );
            }
        }
        Command::Status => match cache.metadata() {
            Some(meta) => {
                let state = if cache.is_valid() { "valid" } else { "stale" };
                println!(
                    "cache {}: last updated {}, {} records, {} unique restaurants",
                    state, meta.last_updated, meta.record_count, meta.unique_restaurants
                );
            }
            None => println!("no cache present"),
        },
    }

    Ok(())
}

fn build_service(config: &AppConfig, cache: CacheStore) -> Result<DatasetService<FetchClient>> {
    let client = FetchClient::new(FetchConfig::from(config))?;
    Ok(DatasetService::new(client, cache))
}

fn print_summary(snapshot: &dinesafe_core::DatasetSnapshot) {
    match snapshot.origin {
        DatasetOrigin::Unavailable => {
            println!("No inspection data available from cache or network.");
        }
        origin => {
            println!(
                "{} records ({} establishments), source: {:?}",
                snapshot.dataset.len(),
                snapshot.dataset.unique_establishments(),
                origin
            );
        }
    }
}
