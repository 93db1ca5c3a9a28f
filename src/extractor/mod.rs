pub mod cleaner;
pub mod model;
pub mod tiers;

#[cfg(test)]
mod tests;

pub use model::{DEFAULT_CONTENT_SELECTORS, ExtractedText, ExtractorConfig};
pub use tiers::Tier;

use once_cell::sync::Lazy;
use scraper::Html;
use tracing::{debug, instrument};

use crate::text::{clean_text, normalize_whitespace};
use tiers::ContentSelector;

static DEFAULT_EXTRACTOR: Lazy<ContentExtractor> = Lazy::new(ContentExtractor::default);

/// Extracts with the default selector table and thresholds.
pub fn extract(markup: &str) -> Option<ExtractedText> {
    DEFAULT_EXTRACTOR.extract(markup)
}

/// Pulls the article body out of a page through tiered fallbacks. Holds only
/// immutable, precompiled selector data, so one instance can serve any
/// number of pages.
#[derive(Debug)]
pub struct ContentExtractor {
    config: ExtractorConfig,
    selectors: Vec<ContentSelector>,
}

impl ContentExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let selectors = config
            .content_selectors
            .iter()
            .map(|source| ContentSelector::compile(source))
            .collect();
        Self { config, selectors }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Returns `None` when no tier finds substantial text.
    #[instrument(level = "debug", skip_all, fields(bytes = markup.len()))]
    pub fn extract(&self, markup: &str) -> Option<ExtractedText> {
        let mut document = Html::parse_document(markup);
        let removed = cleaner::strip_boilerplate(&mut document);

        let Some((tier, blocks)) = Tier::ORDER.into_iter().find_map(|tier| {
            let blocks = tiers::run(tier, &document, &self.selectors, &self.config);
            (!blocks.is_empty()).then_some((tier, blocks))
        }) else {
            debug!(removed, "no substantial text content found");
            return None;
        };

        let combined = normalize_whitespace(&clean_text(&blocks.join("\n\n")));
        if combined.is_empty() {
            return None;
        }

        let text = ExtractedText::bounded(&combined, self.config.max_chars);
        debug!(
            tier = tier.name(),
            blocks = blocks.len(),
            removed,
            chars = text.char_len(),
            "extracted text"
        );
        Some(text)
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}
