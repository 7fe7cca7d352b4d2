//! CSS selectors for product cards.
//!
//! The defaults target listing pages that render products as
//! `<article>` cards inside a `ul[data-elid='product-grid']`. Override them in
//! the `[selectors]` table of the config file when scraping other layouts.

use crate::error::ScrapeError;
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// Product card container.
pub const CONTAINER: &str = "ul[data-elid='product-grid'] > li article";

/// Product name, read as visible text.
pub const NAME: &str = "h2";

/// Price, read as visible text.
pub const PRICE: &str = "span";

/// Link to the product page, read from `href`.
pub const LINK: &str = "a";

/// Product image, read from `src`.
pub const IMAGE: &str = "img";

pub const HREF_ATTR: &str = "href";
pub const SRC_ATTR: &str = "src";

/// Container selector plus one sub-selector per field, each scoped to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub container: String,
    pub name: String,
    pub price: String,
    pub link: String,
    pub image: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: CONTAINER.to_string(),
            name: NAME.to_string(),
            price: PRICE.to_string(),
            link: LINK.to_string(),
            image: IMAGE.to_string(),
        }
    }
}

impl SelectorConfig {
    /// Checks that every selector is valid CSS.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        for (field, selector) in self.fields() {
            compile(field, selector)?;
        }
        Ok(())
    }

    fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("container", &self.container),
            ("name", &self.name),
            ("price", &self.price),
            ("link", &self.link),
            ("image", &self.image),
        ]
    }
}

/// Parses a selector, naming the field it belongs to on failure.
pub fn compile(field: &'static str, selector: &str) -> Result<Selector, ScrapeError> {
    if selector.trim().is_empty() {
        return Err(ScrapeError::InvalidSelector {
            field,
            selector: selector.to_string(),
            reason: "selector is empty".to_string(),
        });
    }

    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_default_selectors_compile() {
        SelectorConfig::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_selector_names_field() {
        let selectors = SelectorConfig { price: "span[[".to_string(), ..SelectorConfig::default() };
        match selectors.validate() {
            Err(ScrapeError::InvalidSelector { field, selector, .. }) => {
                assert_eq!(field, "price");
                assert_eq!(selector, "span[[");
            }
            other => panic!("expected InvalidSelector, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_selector_rejected() {
        let selectors = SelectorConfig { container: "  ".to_string(), ..SelectorConfig::default() };
        let err = selectors.validate().unwrap_err();
        assert!(err.to_string().contains("selector is empty"));
    }

    #[test]
    fn test_container_matches_grid_articles() {
        let html = Html::parse_document(
            r#"<ul data-elid="product-grid">
                <li><article><h2>One</h2></article></li>
                <li><article><h2>Two</h2></article></li>
            </ul>
            <ul><li><article><h2>Not in grid</h2></article></li></ul>"#,
        );

        let container = compile("container", CONTAINER).unwrap();
        assert_eq!(html.select(&container).count(), 2);
    }
}
