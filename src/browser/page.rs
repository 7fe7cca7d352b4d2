//! Page access and the loader's wait strategies.

use crate::config::WaitStrategy;
use crate::error::ScrapeError;
use crate::extract::card::{Card, HtmlCard};
use crate::extract::selectors;
use async_trait::async_trait;
use scraper::Html;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A page the scraper can navigate and query - enables offline runs and tests.
#[async_trait(?Send)]
pub trait Page {
    type Card: Card;

    /// Navigates to `url`.
    async fn goto(&self, url: &str) -> Result<(), ScrapeError>;

    /// Polls until `selector` matches or `timeout` elapses. Returns whether it matched.
    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
        interval: Duration,
    ) -> Result<bool, ScrapeError>;

    /// All elements matching `selector`, in document order.
    async fn cards(&self, selector: &str) -> Result<Vec<Self::Card>, ScrapeError>;
}

/// Navigates to `url` and waits for content according to `wait`.
///
/// A poll that times out is not an error; extraction proceeds with whatever
/// has rendered.
pub async fn load<P: Page + ?Sized>(
    page: &P,
    url: &str,
    wait: WaitStrategy,
    container: &str,
) -> Result<(), ScrapeError> {
    info!("Loading {}", url);
    page.goto(url).await?;

    match wait {
        WaitStrategy::Fixed { duration_ms } => {
            debug!("Waiting {}ms for the page to render", duration_ms);
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }
        WaitStrategy::Poll { timeout_ms, interval_ms } => {
            debug!("Polling for '{}' (up to {}ms)", container, timeout_ms);
            let found = page
                .wait_for(
                    container,
                    Duration::from_millis(timeout_ms),
                    Duration::from_millis(interval_ms),
                )
                .await?;

            if !found {
                warn!("No '{}' appeared within {}ms", container, timeout_ms);
            }
        }
    }

    Ok(())
}

/// A saved HTML document standing in for a live browser.
pub struct StaticPage {
    document: Rc<Html>,
}

impl StaticPage {
    pub fn parse(html: &str) -> Self {
        Self { document: Rc::new(Html::parse_document(html)) }
    }

    /// Reads and parses a saved page.
    pub async fn from_file(path: &Path) -> Result<Self, ScrapeError> {
        let html = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ScrapeError::PageSource { path: path.to_path_buf(), source })?;

        debug!("Read {} bytes of HTML from {}", html.len(), path.display());
        Ok(Self::parse(&html))
    }
}

#[async_trait(?Send)]
impl Page for StaticPage {
    type Card = HtmlCard;

    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        debug!("Static page, not navigating to {}", url);
        Ok(())
    }

    async fn wait_for(
        &self,
        selector: &str,
        _timeout: Duration,
        _interval: Duration,
    ) -> Result<bool, ScrapeError> {
        let selector = selectors::compile("container", selector)?;
        Ok(self.document.select(&selector).next().is_some())
    }

    async fn cards(&self, selector: &str) -> Result<Vec<HtmlCard>, ScrapeError> {
        let selector = selectors::compile("container", selector)?;
        let document = &self.document;
        let cards = document.select(&selector).map(|el| HtmlCard::new(Rc::clone(document), el));
        Ok(cards.collect())
    }
}
