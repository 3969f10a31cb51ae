use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use loader::fetch::SourceFetcher;
use loader::pipeline::run_load;
use loader::store::truncate_all;

/// Loads the regional ITV station sources into the station store.
#[derive(Parser, Debug)]
#[command(name = "loader")]
struct Args {
    /// Comma-separated source codes to load, in order.
    #[arg(long, default_value = "CV,CAT,GAL")]
    sources: String,

    /// Empty the station tables before loading.
    #[arg(long)]
    reset: bool,

    /// Run the full pipeline but roll back every batch.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let db_url = std::env::var("DB_URL").context("DB_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .context("failed to connect to the database")?;
    let fetcher = SourceFetcher::from_env()?;

    println!("=== ITV Station Loader ===");
    println!("  started: {}", chrono::Utc::now().to_rfc3339());
    println!("  sources: {}", args.sources);

    if args.reset {
        truncate_all(&pool).await?;
        println!("  station tables truncated");
    }

    let outcome = run_load(&pool, &fetcher, &args.sources, args.dry_run).await;

    println!("=== Load Summary ===");
    println!("  inserted: {}", outcome.inserted);
    println!("  repaired: {}", outcome.repaired);
    println!("  rejected: {}", outcome.rejected);
    for failure in &outcome.failures {
        eprintln!("  source {} failed: {}", failure.source, failure.error);
    }
    for note in outcome.rejections.iter().take(5) {
        println!(
            "  rejected [{}] {} ({}): {}",
            note.source, note.station, note.locality, note.reason
        );
    }
    if outcome.rejections.len() > 5 {
        println!("  ... and {} more rejections", outcome.rejections.len() - 5);
    }

    Ok(())
}
