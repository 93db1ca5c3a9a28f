use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt;
use url::Url;

use crate::error::TopicError;

/// Everything except RFC 3986 unreserved characters gets escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const SEARCH_LANGUAGE: &str = "eng";

/// A trimmed, non-blank search topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    pub fn new(raw: &str) -> Result<Self, TopicError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TopicError::Blank);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Topic {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// `<root>/search?q=<topic>&lang=eng`
pub fn search_url(root: &Url, topic: &Topic) -> String {
    let base = root.as_str().trim_end_matches('/');
    format!(
        "{base}/search?q={}&lang={SEARCH_LANGUAGE}",
        utf8_percent_encode(topic.as_str(), QUERY_VALUE)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_rejects_blank() {
        assert_eq!(Topic::new("   \t\n"), Err(TopicError::Blank));
        assert_eq!(Topic::new(""), Err(TopicError::Blank));
        assert_eq!(Topic::new("  faith ").unwrap().as_str(), "faith");
    }

    #[test]
    fn test_search_url_encodes_topic() {
        let root = Url::parse("https://www.churchofjesuschrist.org").unwrap();
        let topic = Topic::new("faith & hope/charity").unwrap();
        assert_eq!(
            search_url(&root, &topic),
            "https://www.churchofjesuschrist.org/search?q=faith%20%26%20hope%2Fcharity&lang=eng"
        );
    }

    #[test]
    fn test_search_url_encodes_unicode() {
        let root = Url::parse("http://127.0.0.1:8080/").unwrap();
        let topic = Topic::new("fe y esperanza ñ").unwrap();
        assert_eq!(
            search_url(&root, &topic),
            "http://127.0.0.1:8080/search?q=fe%20y%20esperanza%20%C3%B1&lang=eng"
        );
    }
}
