//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::error::ScrapeError;
use crate::extract::selectors::SelectorConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable holding the page to scrape.
pub const URL_ENV: &str = "URL";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Page to scrape
    #[serde(default)]
    pub url: Option<String>,

    /// CSV file to write
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Keep records whose name came back empty
    #[serde(default)]
    pub keep_unnamed: bool,

    /// Column order of the CSV output
    #[serde(default)]
    pub column_order: ColumnOrder,

    /// How the loader decides the page has rendered
    #[serde(default)]
    pub wait: WaitStrategy,

    /// Container and field selectors
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// WebDriver server settings
    #[serde(default)]
    pub driver: DriverConfig,
}

fn default_output() -> PathBuf {
    PathBuf::from("products.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            output: default_output(),
            keep_unnamed: false,
            column_order: ColumnOrder::default(),
            wait: WaitStrategy::default(),
            selectors: SelectorConfig::default(),
            driver: DriverConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("scraper.toml");
        if local_config.exists() {
            debug!("Found scraper.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("card-scraper").join("config.toml");
            if user_config.exists() {
                debug!("Found config in user config directory");
                return Self::from_file(user_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Empty values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                self.url = Some(url);
            }
        }

        self
    }

    /// Resolves the page to scrape, failing when it is missing or malformed.
    pub fn target_url(&self) -> Result<Url, ScrapeError> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ScrapeError::MissingEnv(URL_ENV))?;

        Url::parse(raw).map_err(|source| ScrapeError::InvalidUrl { url: raw.to_string(), source })
    }
}

/// WebDriver server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// chromedriver binary; a bare name is looked up on PATH
    #[serde(default = "default_driver_path")]
    pub path: PathBuf,

    /// Port the spawned server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// How long to wait for the spawned server to accept connections
    #[serde(default = "default_startup_timeout_ms")]
    pub startup_timeout_ms: u64,

    /// Connect to an already running WebDriver instead of spawning one
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Browser command-line arguments
    #[serde(default = "default_browser_args")]
    pub args: Vec<String>,
}

fn default_driver_path() -> PathBuf {
    PathBuf::from("chromedriver")
}

fn default_port() -> u16 {
    9515
}

fn default_startup_timeout_ms() -> u64 {
    10_000
}

fn default_browser_args() -> Vec<String> {
    ["--headless", "--disable-gpu", "--no-sandbox"].iter().map(|s| s.to_string()).collect()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            path: default_driver_path(),
            port: default_port(),
            startup_timeout_ms: default_startup_timeout_ms(),
            remote_url: None,
            args: default_browser_args(),
        }
    }
}

impl DriverConfig {
    /// WebDriver endpoint the session connects to.
    pub fn endpoint(&self) -> String {
        self.remote_url.clone().unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

/// How the loader waits for dynamic content after navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum WaitStrategy {
    /// Unconditional sleep.
    Fixed {
        #[serde(default = "default_fixed_ms")]
        duration_ms: u64,
    },
    /// Poll for the container selector until it appears or the timeout elapses.
    Poll {
        #[serde(default = "default_poll_timeout_ms")]
        timeout_ms: u64,
        #[serde(default = "default_poll_interval_ms")]
        interval_ms: u64,
    },
}

fn default_fixed_ms() -> u64 {
    5000
}

fn default_poll_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for WaitStrategy {
    fn default() -> Self {
        WaitStrategy::Poll {
            timeout_ms: default_poll_timeout_ms(),
            interval_ms: default_poll_interval_ms(),
        }
    }
}

impl WaitStrategy {
    /// A fixed wait of the given length, saturating at `u64::MAX` milliseconds.
    pub fn fixed(duration: Duration) -> Self {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        WaitStrategy::Fixed { duration_ms }
    }
}

/// Column order of the CSV output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnOrder {
    #[default]
    NamePriceUrlImage,
    UrlImageNamePrice,
}

impl std::str::FromStr for ColumnOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name-price-url-image" | "name" => Ok(ColumnOrder::NamePriceUrlImage),
            "url-image-name-price" | "url" => Ok(ColumnOrder::UrlImageNamePrice),
            _ => Err(format!(
                "Unknown column order: {}. Use: name-price-url-image, url-image-name-price",
                s
            )),
        }
    }
}

impl std::fmt::Display for ColumnOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnOrder::NamePriceUrlImage => write!(f, "name-price-url-image"),
            ColumnOrder::UrlImageNamePrice => write!(f, "url-image-name-price"),
        }
    }
}
