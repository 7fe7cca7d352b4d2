//! Field lookups scoped to a single product card.

use async_trait::async_trait;
use ego_tree::NodeId;
use fantoccini::elements::Element;
use fantoccini::Locator;
use scraper::{ElementRef, Html, Selector};
use std::rc::Rc;
use tracing::trace;

/// A product card whose descendants can be queried by CSS selector.
///
/// Lookups never fail: a missing element or an unreadable property is `None`.
#[async_trait(?Send)]
pub trait Card {
    /// Visible text of the first descendant matching `selector`.
    async fn child_text(&self, selector: &str) -> Option<String>;

    /// Attribute `attr` of the first descendant matching `selector`.
    async fn child_attr(&self, selector: &str, attr: &str) -> Option<String>;
}

#[async_trait(?Send)]
impl Card for Element {
    async fn child_text(&self, selector: &str) -> Option<String> {
        let child = match self.find(Locator::Css(selector)).await {
            Ok(child) => child,
            Err(e) => {
                trace!("No '{}' in card: {}", selector, e);
                return None;
            }
        };

        match child.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                trace!("Could not read text of '{}': {}", selector, e);
                None
            }
        }
    }

    async fn child_attr(&self, selector: &str, attr: &str) -> Option<String> {
        let child = match self.find(Locator::Css(selector)).await {
            Ok(child) => child,
            Err(e) => {
                trace!("No '{}' in card: {}", selector, e);
                return None;
            }
        };

        match child.attr(attr).await {
            Ok(value) => value,
            Err(e) => {
                trace!("Could not read {} of '{}': {}", attr, selector, e);
                None
            }
        }
    }
}

/// A card inside a parsed HTML document.
///
/// Lookups run against the card's node in the full document, so selectors
/// see the same ancestors they would in a live browser.
pub struct HtmlCard {
    document: Rc<Html>,
    node: NodeId,
}

impl HtmlCard {
    /// Wraps `element`, which must belong to `document`.
    pub fn new(document: Rc<Html>, element: ElementRef<'_>) -> Self {
        let node = element.id();
        Self { document, node }
    }

    fn container(&self) -> Option<ElementRef<'_>> {
        self.document.tree.get(self.node).and_then(ElementRef::wrap)
    }

    /// First descendant of the container matching `selector`, excluding the container itself.
    fn first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(selector).ok()?;
        self.container()?.select(&selector).next()
    }
}

#[cfg(test)]
impl HtmlCard {
    /// Card for the first element of a standalone fragment.
    pub(crate) fn from_fragment(html: &str) -> Self {
        let document = Rc::new(Html::parse_fragment(html));
        let root = document.root_element();
        let node = root.child_elements().next().unwrap_or(root).id();
        Self { document, node }
    }
}

#[async_trait(?Send)]
impl Card for HtmlCard {
    async fn child_text(&self, selector: &str) -> Option<String> {
        let element = self.first(selector)?;
        let text = element.text().collect::<String>();
        Some(text.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    async fn child_attr(&self, selector: &str, attr: &str) -> Option<String> {
        self.first(selector)?.value().attr(attr).map(String::from)
    }
}
