//! card-scraper - headless-browser product card scraper
//!
//! Loads a listing page through a WebDriver session, reads every product card
//! matching a CSS selector, and writes name, price, link and image to CSV.

pub mod browser;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod output;

pub use config::Config;
pub use error::ScrapeError;
pub use models::{ProductRecord, ScrapeReport};
