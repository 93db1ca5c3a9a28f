use serde::Serialize;
use std::fmt;

use crate::extractor::{ExtractedText, model::DEFAULT_MAX_CHARS};
use crate::site::CandidateUrl;
use crate::text::clean_text;

/// Identifies where a piece of text came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum SourceKey {
    Url(CandidateUrl),
    /// User-supplied passage, numbered from 1 in insertion order.
    CustomText(usize),
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::CustomText(n) => write!(f, "custom-text-{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub source: SourceKey,
    pub text: ExtractedText,
}

/// Insertion-ordered source identifier to text mapping for one topic query.
///
/// The cap bounds automatically discovered web entries. Manual web entries
/// and custom texts may exceed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceMap {
    entries: Vec<SourceEntry>,
    #[serde(skip)]
    max_web_sources: usize,
}

impl SourceMap {
    pub fn new(max_web_sources: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_web_sources,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn web_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.source, SourceKey::Url(_)))
            .count()
    }

    pub fn max_web_sources(&self) -> usize {
        self.max_web_sources
    }

    pub fn is_full(&self) -> bool {
        self.web_len() >= self.max_web_sources
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(&e.source, SourceKey::Url(u) if u.as_str() == url))
    }

    pub fn get(&self, key: &SourceKey) -> Option<&ExtractedText> {
        self.entries
            .iter()
            .find(|e| &e.source == key)
            .map(|e| &e.text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SourceKey, &ExtractedText)> {
        self.entries.iter().map(|e| (&e.source, &e.text))
    }

    pub fn urls(&self) -> impl Iterator<Item = &CandidateUrl> {
        self.entries.iter().filter_map(|e| match &e.source {
            SourceKey::Url(url) => Some(url),
            SourceKey::CustomText(_) => None,
        })
    }

    /// Inserts a web source. Returns `false`, leaving the map unchanged, when
    /// the URL is already present or the web cap is reached.
    pub fn insert(&mut self, url: CandidateUrl, text: ExtractedText) -> bool {
        if self.is_full() || self.contains_url(url.as_str()) {
            return false;
        }
        self.entries.push(SourceEntry {
            source: SourceKey::Url(url),
            text,
        });
        true
    }

    /// Inserts a caller-chosen web source past the cap. Returns `false` only
    /// for a URL that is already present.
    pub fn insert_manual(&mut self, url: CandidateUrl, text: ExtractedText) -> bool {
        if self.contains_url(url.as_str()) {
            return false;
        }
        self.entries.push(SourceEntry {
            source: SourceKey::Url(url),
            text,
        });
        true
    }

    /// Adds a user-provided quote or passage. Blank input is ignored.
    pub fn add_custom_text(&mut self, text: &str) -> Option<SourceKey> {
        let cleaned = clean_text(text.trim());
        if cleaned.trim().is_empty() {
            return None;
        }
        let n = self.entries.len() - self.web_len() + 1;
        let key = SourceKey::CustomText(n);
        self.entries.push(SourceEntry {
            source: key.clone(),
            text: ExtractedText::bounded(cleaned.trim(), DEFAULT_MAX_CHARS),
        });
        Some(key)
    }

    pub fn into_entries(self) -> Vec<SourceEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a SourceMap {
    type Item = (&'a SourceKey, &'a ExtractedText);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
