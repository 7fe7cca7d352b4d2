//! Turns product cards into records.

pub mod card;
pub mod selectors;

pub use card::{Card, HtmlCard};
pub use selectors::SelectorConfig;

use crate::models::ProductRecord;
use selectors::{HREF_ATTR, SRC_ATTR};
use tracing::{debug, trace};

/// Records extracted from one page.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Records in document order
    pub records: Vec<ProductRecord>,
    /// Cards inspected
    pub matched: usize,
    /// Cards discarded for having no name
    pub dropped: usize,
}

/// Reads the four fields of every card with the configured sub-selectors.
pub struct Extractor<'a> {
    selectors: &'a SelectorConfig,
    keep_unnamed: bool,
}

impl<'a> Extractor<'a> {
    pub fn new(selectors: &'a SelectorConfig, keep_unnamed: bool) -> Self {
        Self { selectors, keep_unnamed }
    }

    /// Extracts one record. Each field is looked up independently and a miss
    /// only empties that field.
    pub async fn record<C: Card + ?Sized>(&self, card: &C) -> ProductRecord {
        let name = card.child_text(&self.selectors.name).await;
        let price = card.child_text(&self.selectors.price).await;
        let url = card.child_attr(&self.selectors.link, HREF_ATTR).await;
        let image = card.child_attr(&self.selectors.image, SRC_ATTR).await;

        ProductRecord {
            name: clean(name),
            price: clean(price),
            url: clean(url),
            image: clean(image),
        }
    }

    /// Extracts every card in order, dropping unnamed records unless configured to keep them.
    pub async fn extract<C: Card>(&self, cards: &[C]) -> Extraction {
        let mut extraction = Extraction { matched: cards.len(), ..Default::default() };

        for (idx, card) in cards.iter().enumerate() {
            let record = self.record(card).await;

            if !self.keep_unnamed && !record.has_name() {
                trace!("Skipping card {} without a name", idx);
                extraction.dropped += 1;
                continue;
            }

            trace!("Card {}: {} ({})", idx, record.name, record.price);
            extraction.records.push(record);
        }

        debug!(
            "Extracted {} records from {} cards ({} without a name)",
            extraction.records.len(),
            extraction.matched,
            extraction.dropped
        );

        extraction
    }
}

fn clean(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}
