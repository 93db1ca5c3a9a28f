//! Finds candidate content pages for a topic by scraping the site's own
//! search results.
//!
//! Discovery never fails outright: an unreachable search endpoint or a page
//! with no usable links simply produces an empty candidate list.

pub mod links;
pub mod search;

pub use links::{DEFAULT_LINK_SELECTORS, FallbackScope, LinkStrategy, collect_links};
pub use search::{Topic, search_url};

use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::fetcher::HtmlFetcher;
use crate::site::{CandidateUrl, SitePolicy};

#[derive(Debug)]
pub struct LinkDiscoverer {
    policy: SitePolicy,
    strategies: Vec<LinkStrategy>,
    fallback: FallbackScope,
}

impl LinkDiscoverer {
    pub fn new(policy: SitePolicy, selectors: &[&str], fallback: FallbackScope) -> Self {
        Self {
            policy,
            strategies: selectors.iter().map(|s| LinkStrategy::compile(s)).collect(),
            fallback,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.site_policy(),
            DEFAULT_LINK_SELECTORS,
            config.fallback_scope(),
        )
    }

    pub fn policy(&self) -> &SitePolicy {
        &self.policy
    }

    /// Searches the site for `topic` and returns at most `max_results`
    /// unique candidate URLs in strategy-then-document order.
    #[instrument(skip(self, fetcher), fields(topic = %topic))]
    pub async fn discover(
        &self,
        fetcher: &HtmlFetcher,
        topic: &Topic,
        max_results: usize,
    ) -> Vec<CandidateUrl> {
        let url = search_url(self.policy.root(), topic);
        info!(%url, "searching");

        let page = match fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "search request failed; no candidates");
                return Vec::new();
            }
        };

        let found = self.candidates_in(&page.body_utf8, max_results);
        info!(count = found.len(), "discovered candidate urls");
        found
    }

    /// Link extraction over an already fetched results page.
    pub fn candidates_in(&self, markup: &str, max_results: usize) -> Vec<CandidateUrl> {
        collect_links(
            markup,
            &self.policy,
            &self.strategies,
            self.fallback,
            max_results,
        )
    }
}
