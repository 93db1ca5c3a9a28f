use serde::Serialize;
use std::fmt;

use crate::text::truncate_chars;

/// Content selectors, most specific first.
pub const DEFAULT_CONTENT_SELECTORS: &[&str] = &[
    ".body-block",
    ".article-body",
    "main article",
    ".study-content",
    ".lds-scripture",
    ".content-body",
    "[role='main']",
    ".page-content",
    ".document",
    "#content",
    ".passage-text",
    ".verse",
    ".body",
];

const DEFAULT_MIN_BLOCK_CHARS: usize = 100;
const DEFAULT_MIN_PARAGRAPH_CHARS: usize = 50;
const DEFAULT_MIN_LINE_CHARS: usize = 50;
pub const DEFAULT_MAX_CHARS: usize = 10_000;

/// Best-effort article body for one page, never longer than the configured
/// character cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn bounded(text: &str, max_chars: usize) -> Self {
        Self(truncate_chars(text, max_chars).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub content_selectors: Vec<String>,
    /// A container block must be longer than this to count.
    pub min_block_chars: usize,
    pub min_paragraph_chars: usize,
    pub min_line_chars: usize,
    pub max_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            content_selectors: DEFAULT_CONTENT_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_block_chars: DEFAULT_MIN_BLOCK_CHARS,
            min_paragraph_chars: DEFAULT_MIN_PARAGRAPH_CHARS,
            min_line_chars: DEFAULT_MIN_LINE_CHARS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}
