use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::site::{CandidateUrl, SitePolicy};

/// Result-link selectors, most specific first.
pub const DEFAULT_LINK_SELECTORS: &[&str] = &[
    "a[href*='/study/']",
    "a[href*='/manual/']",
    "a[href*='/general-conference/']",
    "a[href*='/scriptures/']",
    ".result-title a",
    "a.result-link",
    "a.link",
    "a.absolute",
    "a[data-testid]",
];

static ANY_ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// What the last-resort anchor scan is allowed to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackScope {
    /// On-site, not denylisted, and under an allowed content prefix.
    #[default]
    AllowedPaths,
    /// On-site and not denylisted.
    AnyOnSite,
}

impl FromStr for FallbackScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allowed-paths" | "allowed_paths" => Ok(Self::AllowedPaths),
            "any-on-site" | "any_on_site" => Ok(Self::AnyOnSite),
            other => Err(format!(
                "unknown fallback scope {other:?} (expected allowed-paths or any-on-site)"
            )),
        }
    }
}

#[derive(Debug)]
pub struct LinkStrategy {
    source: String,
    compiled: Result<Selector, String>,
}

impl LinkStrategy {
    pub fn compile(source: &str) -> Self {
        Self {
            source: source.to_string(),
            compiled: Selector::parse(source).map_err(|e| e.to_string()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn anchors<'a>(&self, document: &'a Html) -> Result<Vec<ElementRef<'a>>, &str> {
        let selector = self.compiled.as_ref().map_err(String::as_str)?;
        Ok(document.root_element().select(selector).collect())
    }
}

/// Ordered, duplicate-free URL list with a hard cap.
struct Collected {
    urls: Vec<CandidateUrl>,
    max: usize,
}

impl Collected {
    fn is_full(&self) -> bool {
        self.urls.len() >= self.max
    }

    fn push(&mut self, candidate: CandidateUrl) -> bool {
        if self.is_full() || self.urls.contains(&candidate) {
            return false;
        }
        debug!(url = %candidate, "found candidate");
        self.urls.push(candidate);
        true
    }
}

/// Pulls candidate URLs out of a search results page.
///
/// Strategies run in order and stop as soon as `max` URLs are held. When
/// they come up short, every anchor on the page is scanned under the
/// fallback scope.
pub fn collect_links(
    markup: &str,
    policy: &SitePolicy,
    strategies: &[LinkStrategy],
    fallback: FallbackScope,
    max: usize,
) -> Vec<CandidateUrl> {
    let document = Html::parse_document(markup);
    let mut collected = Collected {
        urls: Vec::with_capacity(max),
        max,
    };

    for strategy in strategies {
        if collected.is_full() {
            break;
        }
        match strategy.anchors(&document) {
            Ok(anchors) => {
                for anchor in anchors {
                    if collected.is_full() {
                        break;
                    }
                    let candidate = href(anchor)
                        .and_then(|href| policy.resolve_href(href))
                        .and_then(|url| policy.candidate(url).ok());
                    if let Some(candidate) = candidate {
                        collected.push(candidate);
                    }
                }
            }
            Err(reason) => {
                warn!(selector = strategy.source(), %reason, "link selector failed; skipping");
            }
        }
    }

    if !collected.is_full() {
        let before = collected.urls.len();
        for anchor in document.root_element().select(&ANY_ANCHOR) {
            if collected.is_full() {
                break;
            }
            let Some(url) = href(anchor).and_then(|href| policy.resolve_href(href)) else {
                continue;
            };
            if policy.is_denied_path(&url) {
                continue;
            }
            let candidate = match fallback {
                FallbackScope::AllowedPaths => policy.candidate(url).ok(),
                FallbackScope::AnyOnSite => policy.loose_candidate(url),
            };
            if let Some(candidate) = candidate {
                collected.push(candidate);
            }
        }
        debug!(added = collected.urls.len() - before, "fallback anchor scan");
    }

    collected.urls
}

fn href(anchor: ElementRef<'_>) -> Option<&str> {
    anchor
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
}
