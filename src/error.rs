use thiserror::Error;

use crate::fetcher::FetchError;
use crate::site::CandidateRejection;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicError {
    #[error("topic must not be blank")]
    Blank,
}

/// Why a single page produced no text. Always recoverable: the caller skips
/// the page and moves on.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no substantial text content found")]
    NoContentExtracted,
}

/// Rejections from adding a caller-supplied URL to a source map. The map is
/// left untouched in every case.
#[derive(Error, Debug)]
pub enum ManualSourceError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("only pages on {expected} are accepted (got host {host:?})")]
    DisallowedHost { host: String, expected: String },

    #[error("path {0:?} is not an allowed content path")]
    DisallowedPath(String),

    #[error("{0} is already included")]
    Duplicate(String),

    #[error("failed to load page: {0}")]
    Source(#[from] SourceError),
}

impl ManualSourceError {
    /// The URL itself is unacceptable, independent of the map or the page.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_) | Self::DisallowedHost { .. } | Self::DisallowedPath(_)
        )
    }

    pub(crate) fn from_rejection(rejection: CandidateRejection, expected: &str) -> Self {
        match rejection {
            CandidateRejection::DisallowedHost(host) => Self::DisallowedHost {
                host,
                expected: expected.to_string(),
            },
            CandidateRejection::DisallowedPath(path) => Self::DisallowedPath(path),
        }
    }
}
