//! Error types for each stage of a scrape run.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fatal failures of a scrape run.
///
/// Extraction misses (a card without a price, an image without `src`) are
/// never represented here; the extractor absorbs them as empty fields.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Environment variable {0} is required")]
    MissingEnv(&'static str),

    #[error("Invalid target URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid {field} selector '{selector}': {reason}")]
    InvalidSelector { field: &'static str, selector: String, reason: String },

    #[error("Failed to start WebDriver server at {}: {source}", path.display())]
    DriverStart {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Port {port} is already in use")]
    PortInUse { port: u16 },

    #[error("WebDriver server exited before accepting connections ({status})")]
    DriverExited { status: std::process::ExitStatus },

    #[error("WebDriver server on port {port} was not ready within {timeout:?}")]
    DriverNotReady { port: u16, timeout: Duration },

    #[error("Failed to connect to WebDriver at {url}: {source}")]
    Session {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("Failed to load page {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("Failed to find products matching '{selector}': {source}")]
    Query {
        selector: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("Failed to read page source {}: {source}", path.display())]
    PageSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV file {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
