//! Data models for scraped product cards.

use std::path::PathBuf;

/// One product card as rendered on the page. Every field is free-form text;
/// a field whose element was missing is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRecord {
    /// Visible title text
    pub name: String,
    /// Price exactly as displayed
    pub price: String,
    /// Link target, relative or absolute
    pub url: String,
    /// Image source URL
    pub image: String,
}

impl ProductRecord {
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeReport {
    /// Containers matched on the page
    pub matched: usize,
    /// Records written to the output file
    pub written: usize,
    /// Records dropped because their name was empty
    pub dropped: usize,
    /// File the records were written to
    pub output: PathBuf,
}

impl ScrapeReport {
    /// Line printed on success.
    pub fn completion_line(&self) -> String {
        format!("Scraping completed. Found {} products.", self.written)
    }
}
