//! Shelf-Scout main entry point
//!
//! This is the command-line interface for the Shelf-Scout product scraper.

use anyhow::Context;
use clap::Parser;
use shelf_scout::config::{load_config_with_hash, Config};
use shelf_scout::crawler::{build_page_url, scrape};
use shelf_scout::output::{
    print_summary, timestamped_path, write_products_csv, CsvSink, DatasetSink, DatasetSummary,
    SqliteSink,
};
use shelf_scout::record::normalize_all;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shelf-Scout: a polite product-listing scraper
///
/// Shelf-Scout walks the result pages of a product search, extracts name,
/// URL, price, rating and review count for each listing, and writes a
/// categorized dataset ready for analytics tools.
#[derive(Parser, Debug)]
#[command(name = "shelf-scout")]
#[command(version)]
#[command(about = "A polite product-listing scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the maximum number of result pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Override the maximum number of products
    #[arg(long, value_name = "N")]
    max_products: Option<usize>,

    /// Validate config and show what would be scraped without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(max_pages) = cli.max_pages {
        config.pagination.max_pages = max_pages;
    }
    if let Some(max_products) = cli.max_products {
        config.pagination.max_products = max_products;
    }
    shelf_scout::config::validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_scrape(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_scout=info,warn"),
            1 => EnvFilter::new("shelf_scout=debug,info"),
            2 => EnvFilter::new("shelf_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Shelf-Scout Dry Run ===\n");

    println!("Search:");
    println!("  Base URL: {}", config.search.base_url);
    println!("  Query: {}", config.search.query);
    println!("  First page: {}", build_page_url(&config.search, 1)?);

    println!("\nPagination:");
    println!("  Max pages: {}", config.pagination.max_pages);
    println!("  Max products: {}", config.pagination.max_products);
    println!(
        "  Stop after consecutive failures: {}",
        config.pagination.failure_threshold
    );

    println!("\nRequests:");
    println!(
        "  Politeness delay: {}-{}ms",
        config.request.min_delay_ms, config.request.max_delay_ms
    );
    println!("  Attempts per page: {}", config.request.max_attempts);
    println!("  Timeout: {}s", config.request.timeout_secs);

    println!("\nSelectors:");
    println!("  Containers: {}", config.selectors.containers.len());
    println!("  Name: {}", config.selectors.name.len());
    println!("  Link: {}", config.selectors.link.len());
    println!("  Price: {}", config.selectors.price.len());
    println!("  Rating: {}", config.selectors.rating.len());
    println!("  Reviews: {}", config.selectors.reviews.len());

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main scrape: fetch, normalize, persist, summarize
async fn handle_scrape(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting to scrape '{}' from {}",
        config.search.query,
        config.search.base_url
    );

    let outcome = scrape(config).await?;
    tracing::info!(
        "Run stopped ({:?}) after {} pages, {} failed",
        outcome.stop_reason,
        outcome.pages_visited,
        outcome.pages_failed
    );

    if outcome.records.is_empty() {
        tracing::warn!("No products were scraped; nothing to save");
        if let Some(dir) = &config.output.debug_dir {
            println!("No products were scraped. Check {} for saved pages.", dir);
        } else {
            println!("No products were scraped.");
        }
        return Ok(());
    }

    let csv_path = config
        .output
        .csv_path
        .clone()
        .unwrap_or_else(|| timestamped_path("products", "csv"));
    let location = write_products_csv(Path::new(&csv_path), &outcome.records)?;
    println!("Basic CSV file: {}", location);

    let analytics = normalize_all(&outcome.records);

    let analytics_path = config
        .output
        .analytics_csv_path
        .clone()
        .unwrap_or_else(|| timestamped_path("analytics", "csv"));
    let location = CsvSink::new(&analytics_path).write(&analytics)?;
    println!("Analytics CSV file: {}", location);

    if let Some(db_path) = &config.output.database_path {
        let location = SqliteSink::new(Path::new(db_path))?.write(&analytics)?;
        println!("Database: {}", location);
    }

    println!();
    print_summary(&DatasetSummary::from_records(&analytics));

    Ok(())
}
