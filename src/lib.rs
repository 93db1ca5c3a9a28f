//! Topic-driven discovery and extraction of article text from a single
//! content website.
//!
//! The pipeline searches the site for a topic, keeps the result links that
//! point at content sections, fetches each page once and pulls the body text
//! out through a tiered set of selector strategies. The output is an ordered
//! [`SourceMap`] of source identifier to extracted text.

pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod site;
pub mod sources;
pub mod text;

pub use config::Config;
pub use discovery::{LinkDiscoverer, Topic};
pub use error::{ManualSourceError, SourceError, TopicError};
pub use extractor::{ContentExtractor, ExtractedText};
pub use fetcher::{FetchError, HtmlFetcher};
pub use site::{CandidateUrl, SitePolicy};
pub use sources::{SourceAggregator, SourceKey, SourceMap};
