//! WebDriver session driving headless Chrome.

use crate::browser::page::Page;
use crate::error::ScrapeError;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Capabilities requesting Chrome with the given command-line arguments.
pub fn chrome_capabilities(args: &[String]) -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// An open browser session. Call [`BrowserSession::close`] when done; the
/// browser stays open otherwise until the server is stopped.
pub struct BrowserSession {
    client: Client,
}

impl BrowserSession {
    /// Opens a session against the WebDriver server at `endpoint`.
    pub async fn connect(endpoint: &str, args: &[String]) -> Result<Self, ScrapeError> {
        info!("Connecting to WebDriver at {}", endpoint);

        let client = ClientBuilder::native()
            .capabilities(chrome_capabilities(args))
            .connect(endpoint)
            .await
            .map_err(|source| ScrapeError::Session { url: endpoint.to_string(), source })?;

        debug!("WebDriver session established");
        Ok(Self { client })
    }

    /// Ends the session and closes the browser.
    pub async fn close(self) {
        debug!("Closing WebDriver session");
        if let Err(e) = self.client.close().await {
            warn!("Failed to close WebDriver session: {}", e);
        }
    }
}

#[async_trait(?Send)]
impl Page for BrowserSession {
    type Card = Element;

    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.client
            .goto(url)
            .await
            .map_err(|source| ScrapeError::Navigation { url: url.to_string(), source })
    }

    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
        interval: Duration,
    ) -> Result<bool, ScrapeError> {
        let found = self
            .client
            .wait()
            .at_most(timeout)
            .every(interval)
            .for_element(Locator::Css(selector))
            .await;

        match found {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => Ok(false),
            Err(source) => Err(ScrapeError::Query { selector: selector.to_string(), source }),
        }
    }

    async fn cards(&self, selector: &str) -> Result<Vec<Element>, ScrapeError> {
        self.client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|source| ScrapeError::Query { selector: selector.to_string(), source })
    }
}
