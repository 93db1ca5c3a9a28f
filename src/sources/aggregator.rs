use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::discovery::{LinkDiscoverer, Topic};
use crate::error::{ManualSourceError, SourceError};
use crate::extractor::{ContentExtractor, ExtractedText};
use crate::fetcher::{FetchError, HtmlFetcher};
use crate::site::CandidateUrl;
use crate::sources::map::SourceMap;

/// Runs discovery, fetching and extraction for a topic, one request at a
/// time with a courtesy pause between candidates.
#[derive(Debug)]
pub struct SourceAggregator {
    fetcher: HtmlFetcher,
    discoverer: LinkDiscoverer,
    extractor: ContentExtractor,
    max_candidates: usize,
    max_sources: usize,
    pacing: Duration,
}

impl SourceAggregator {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: HtmlFetcher::from_config(config)?,
            discoverer: LinkDiscoverer::from_config(config),
            extractor: ContentExtractor::default(),
            max_candidates: config.max_candidates(),
            max_sources: config.max_sources(),
            pacing: config.pacing(),
        })
    }

    pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn discoverer(&self) -> &LinkDiscoverer {
        &self.discoverer
    }

    pub async fn discover(&self, topic: &Topic) -> Vec<CandidateUrl> {
        self.discoverer
            .discover(&self.fetcher, topic, self.max_candidates)
            .await
    }

    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_and_extract(&self, url: &CandidateUrl) -> Result<ExtractedText, SourceError> {
        let page = self.fetcher.fetch(url.as_str()).await?;
        self.extractor
            .extract(&page.body_utf8)
            .ok_or(SourceError::NoContentExtracted)
    }

    pub async fn aggregate(&self, topic: &Topic) -> SourceMap {
        self.aggregate_until(topic, &CancellationToken::new()).await
    }

    /// Like [`aggregate`](Self::aggregate), but stops issuing requests once
    /// `cancel` fires and returns what has been collected so far.
    #[instrument(skip(self, cancel), fields(topic = %topic))]
    pub async fn aggregate_until(&self, topic: &Topic, cancel: &CancellationToken) -> SourceMap {
        let mut sources = SourceMap::new(self.max_sources);

        let candidates = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("cancelled during discovery");
                return sources;
            }
            found = self.discover(topic) => found,
        };
        if candidates.is_empty() {
            warn!("no candidates found");
            return sources;
        }

        let total = candidates.len();
        for (i, url) in candidates.iter().enumerate() {
            if sources.is_full() {
                info!(max = self.max_sources, "reached source limit");
                break;
            }
            if i > 0 && !self.pause(cancel).await {
                info!(collected = sources.len(), "cancelled; returning partial sources");
                break;
            }

            info!(index = i + 1, total, %url, "processing candidate");
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(collected = sources.len(), "cancelled; returning partial sources");
                    break;
                }
                result = self.fetch_and_extract(url) => result,
            };

            match result {
                Ok(text) => {
                    info!(%url, chars = text.char_len(), "extracted content");
                    sources.insert(url.clone(), text);
                }
                Err(e) => warn!(%url, error = %e, "skipping candidate"),
            }
        }

        info!(count = sources.len(), "sources collected");
        sources
    }

    /// Waits out the pacing interval. Returns `false` if cancelled first.
    async fn pause(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        if self.pacing.is_zero() {
            return true;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.pacing) => true,
        }
    }

    /// Validates, fetches and inserts a caller-supplied URL. The web cap
    /// only bounds automatic discovery, so this succeeds on a full map. On
    /// any error `sources` is left unchanged.
    #[instrument(skip(self, sources))]
    pub async fn add_manual_source(
        &self,
        sources: &mut SourceMap,
        url: &str,
    ) -> Result<CandidateUrl, ManualSourceError> {
        let policy = self.discoverer.policy();
        let parsed = Url::parse(url.trim())?;
        let candidate = policy
            .candidate(parsed)
            .map_err(|rejection| ManualSourceError::from_rejection(rejection, policy.domain()))?;

        if sources.contains_url(candidate.as_str()) {
            return Err(ManualSourceError::Duplicate(candidate.to_string()));
        }

        let text = self.fetch_and_extract(&candidate).await?;
        info!(url = %candidate, chars = text.char_len(), "added manual source");
        sources.insert_manual(candidate.clone(), text);
        Ok(candidate)
    }
}
