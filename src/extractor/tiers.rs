use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use crate::extractor::cleaner::element_text;
use crate::extractor::model::ExtractorConfig;
use crate::text::char_len;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Extraction heuristics, from most to least specific. Each later tier only
/// runs when every earlier one produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Containers,
    Paragraphs,
    BodyLines,
}

impl Tier {
    pub const ORDER: [Tier; 3] = [Tier::Containers, Tier::Paragraphs, Tier::BodyLines];

    pub fn name(self) -> &'static str {
        match self {
            Tier::Containers => "containers",
            Tier::Paragraphs => "paragraphs",
            Tier::BodyLines => "body-lines",
        }
    }
}

/// A content selector as configured, compiled once. A selector that fails to
/// parse is kept as a failed attempt so it is reported and skipped at
/// extraction time instead of aborting construction.
#[derive(Debug)]
pub struct ContentSelector {
    source: String,
    compiled: Result<Selector, String>,
}

impl ContentSelector {
    pub fn compile(source: &str) -> Self {
        Self {
            source: source.to_string(),
            compiled: Selector::parse(source).map_err(|e| e.to_string()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    /// Text of every matching element, in document order.
    fn matches(&self, document: &Html) -> Result<Vec<String>, &str> {
        let selector = self.compiled.as_ref().map_err(String::as_str)?;
        Ok(document
            .root_element()
            .select(selector)
            .map(|element| element_text(element, "\n"))
            .collect())
    }
}

pub(crate) fn run(
    tier: Tier,
    document: &Html,
    selectors: &[ContentSelector],
    config: &ExtractorConfig,
) -> Vec<String> {
    match tier {
        Tier::Containers => containers(document, selectors, config.min_block_chars),
        Tier::Paragraphs => paragraphs(document, config.min_paragraph_chars),
        Tier::BodyLines => body_lines(document, config.min_line_chars),
    }
}

/// Every selector is evaluated in full so disjoint content regions on the
/// same page are all collected.
fn containers(document: &Html, selectors: &[ContentSelector], min_chars: usize) -> Vec<String> {
    selectors.iter().fold(Vec::new(), |mut blocks, selector| {
        match selector.matches(document) {
            Ok(texts) => {
                for text in texts {
                    if char_len(&text) > min_chars && !blocks.contains(&text) {
                        blocks.push(text);
                    }
                }
            }
            Err(reason) => {
                debug!(selector = selector.source(), %reason, "skipping content selector");
            }
        }
        blocks
    })
}

fn paragraphs(document: &Html, min_chars: usize) -> Vec<String> {
    document
        .root_element()
        .select(&PARAGRAPH)
        .map(|p| element_text(p, " "))
        .filter(|text| char_len(text) > min_chars)
        .collect()
}

fn body_lines(document: &Html, min_chars: usize) -> Vec<String> {
    let Some(body) = document.root_element().select(&BODY).next() else {
        return Vec::new();
    };
    element_text(body, "\n")
        .lines()
        .map(str::trim)
        .filter(|line| char_len(line) > min_chars)
        .map(String::from)
        .collect()
}
