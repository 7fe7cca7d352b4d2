//! Scrape command implementation.

use crate::browser::{load, BrowserSession, DriverService, Page, StaticPage};
use crate::config::Config;
use crate::extract::Extractor;
use crate::models::ScrapeReport;
use crate::output::CsvWriter;
use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

/// Runs one scrape: load the page, extract cards, write the CSV.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scrapes the configured URL through a live browser session.
    ///
    /// The URL and selectors are checked before anything is started. Once the
    /// session is open it is closed, and the server stopped, whether or not
    /// the scrape succeeds.
    pub async fn execute(&self) -> Result<ScrapeReport> {
        let url = self.config.target_url()?;
        self.config.selectors.validate()?;

        let driver = &self.config.driver;
        let service = if driver.remote_url.is_some() {
            None
        } else {
            Some(DriverService::start(driver).await?)
        };

        let session = BrowserSession::connect(&driver.endpoint(), &driver.args).await?;

        let result = self.execute_with_page(&session, url.as_str()).await;

        session.close().await;
        if let Some(service) = service {
            service.stop().await;
        }

        result
    }

    /// Scrapes a saved HTML file instead of a live page.
    pub async fn execute_offline(&self, html_path: &Path) -> Result<ScrapeReport> {
        self.config.selectors.validate()?;

        let page = StaticPage::from_file(html_path).await?;
        let source = format!("file://{}", html_path.display());
        self.execute_with_page(&page, &source).await
    }

    /// Runs the load, extract and write stages against any page (for testing).
    pub async fn execute_with_page<P: Page>(&self, page: &P, url: &str) -> Result<ScrapeReport> {
        let selectors = &self.config.selectors;

        load(page, url, self.config.wait, &selectors.container).await?;

        let cards = page.cards(&selectors.container).await?;
        info!("Found {} product cards", cards.len());
        if cards.is_empty() {
            warn!("No elements matched '{}'", selectors.container);
        }

        let extraction = Extractor::new(selectors, self.config.keep_unnamed).extract(&cards).await;

        CsvWriter::new(self.config.column_order)
            .write_file(&self.config.output, &extraction.records)?;

        Ok(ScrapeReport {
            matched: extraction.matched,
            written: extraction.records.len(),
            dropped: extraction.dropped,
            output: self.config.output.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnOrder, WaitStrategy};
    use crate::error::ScrapeError;
    use tempfile::tempdir;

    fn scrape_error(err: &anyhow::Error) -> Option<&ScrapeError> {
        err.downcast_ref::<ScrapeError>()
    }

    const PAGE: &str = r#"<html><body>
        <ul data-elid="product-grid">
            <li><article>
                <a href="/p/runner"><img src="https://cdn.shop.test/runner.jpg"></a>
                <h2>Runner</h2><span>$120</span>
            </article></li>
            <li><article>
                <a href="/p/unnamed"><img src="https://cdn.shop.test/unnamed.jpg"></a>
                <span>$10</span>
            </article></li>
        </ul>
    </body></html>"#;

    fn make_test_config(output: &Path) -> Config {
        Config {
            output: output.to_path_buf(),
            wait: WaitStrategy::Poll { timeout_ms: 10, interval_ms: 5 },
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_execute_with_static_page() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("products.csv");
        let cmd = ScrapeCommand::new(make_test_config(&output));

        let report = cmd
            .execute_with_page(&StaticPage::parse(PAGE), "https://shop.test/")
            .await
            .unwrap();
        assert_eq!(report.matched, 2);
        assert_eq!(report.written, 1);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.completion_line(), "Scraping completed. Found 1 products.");

        let csv = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            csv,
            "Name,Price,URL,Image\nRunner,$120,/p/runner,https://cdn.shop.test/runner.jpg\n"
        );
    }

    #[tokio::test]
    async fn test_execute_keep_unnamed_url_first() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("products.csv");
        let mut config = make_test_config(&output);
        config.keep_unnamed = true;
        config.column_order = ColumnOrder::UrlImageNamePrice;

        let report = ScrapeCommand::new(config)
            .execute_with_page(&StaticPage::parse(PAGE), "https://shop.test/")
            .await
            .unwrap();
        assert_eq!(report.written, 2);

        let csv = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "URL,Image,Name,Price");
        assert_eq!(lines[2], "/p/unnamed,https://cdn.shop.test/unnamed.jpg,,$10");
    }

    #[tokio::test]
    async fn test_execute_without_url_creates_nothing() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("products.csv");
        let cmd = ScrapeCommand::new(make_test_config(&output));

        let err = cmd.execute().await.unwrap_err();
        assert!(matches!(scrape_error(&err), Some(ScrapeError::MissingEnv("URL"))));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_selector_before_starting_browser() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("products.csv");
        let mut config = make_test_config(&output);
        config.url = Some("https://shop.test/".to_string());
        config.selectors.name = "h2[[".to_string();
        config.driver.path = "/nonexistent/bin/chromedriver".into();

        let err = ScrapeCommand::new(config).execute().await.unwrap_err();
        assert!(matches!(
            scrape_error(&err),
            Some(ScrapeError::InvalidSelector { field: "name", .. })
        ));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_execute_missing_driver_is_fatal() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("products.csv");
        let mut config = make_test_config(&output);
        config.url = Some("https://shop.test/".to_string());
        config.driver.path = "/nonexistent/bin/chromedriver".into();

        let err = ScrapeCommand::new(config).execute().await.unwrap_err();
        assert!(matches!(scrape_error(&err), Some(ScrapeError::DriverStart { .. })));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_execute_unwritable_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("no-such-dir").join("products.csv");
        let cmd = ScrapeCommand::new(make_test_config(&output));

        let err = cmd
            .execute_with_page(&StaticPage::parse(PAGE), "https://shop.test/")
            .await
            .unwrap_err();
        assert!(matches!(scrape_error(&err), Some(ScrapeError::Output { .. })));
    }

    #[tokio::test]
    async fn test_execute_offline() {
        let dir = tempdir().unwrap();
        let page_path = dir.path().join("page.html");
        std::fs::write(&page_path, PAGE).unwrap();
        let output = dir.path().join("products.csv");

        let report =
            ScrapeCommand::new(make_test_config(&output)).execute_offline(&page_path).await.unwrap();
        assert_eq!(report.written, 1);
        assert!(output.exists());
    }
}
