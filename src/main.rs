//! card-scraper - headless-browser product card scraper
//!
//! Reads the page to scrape from the `URL` environment variable and writes
//! the product cards it finds to `products.csv`.

use anyhow::Result;
use card_scraper::commands::ScrapeCommand;
use card_scraper::config::{ColumnOrder, Config, WaitStrategy};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "card-scraper",
    version,
    about = "Scrape product cards from a rendered page into CSV",
    long_about = "Drives headless Chrome through chromedriver, extracts every product card \
                  matching a CSS selector and writes name, price, link and image to a CSV file."
)]
struct Cli {
    /// Page to scrape (overrides the URL environment variable)
    #[arg(long)]
    url: Option<String>,

    /// CSV file to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scrape a saved HTML file instead of launching a browser
    #[arg(long, value_name = "FILE")]
    from_html: Option<PathBuf>,

    /// Keep cards whose name is empty
    #[arg(long)]
    keep_unnamed: bool,

    /// CSV column order (name-price-url-image, url-image-name-price)
    #[arg(long)]
    columns: Option<ColumnOrder>,

    /// Wait a fixed number of milliseconds after navigation instead of polling
    #[arg(long, value_name = "MS")]
    fixed_wait: Option<u64>,

    /// chromedriver binary
    #[arg(long)]
    driver_path: Option<PathBuf>,

    /// Port for the spawned chromedriver
    #[arg(long)]
    port: Option<u16>,

    /// Use an already running WebDriver server instead of spawning chromedriver
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(url) = cli.url {
        config.url = Some(url);
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if cli.keep_unnamed {
        config.keep_unnamed = true;
    }
    if let Some(columns) = cli.columns {
        config.column_order = columns;
    }
    if let Some(ms) = cli.fixed_wait {
        config.wait = WaitStrategy::fixed(Duration::from_millis(ms));
    }
    if let Some(path) = cli.driver_path {
        config.driver.path = path;
    }
    if let Some(port) = cli.port {
        config.driver.port = port;
    }
    if let Some(url) = cli.webdriver_url {
        config.driver.remote_url = Some(url);
    }

    let cmd = ScrapeCommand::new(config);
    let report = match cli.from_html {
        Some(path) => cmd.execute_offline(&path).await?,
        None => cmd.execute().await?,
    };

    println!("{}", report.completion_line());

    Ok(())
}
