use chrono::{DateTime, Utc};
use encoding_rs::Encoding;
use reqwest::StatusCode;
use url::Url;

/// A successfully fetched HTML document, decoded to UTF-8.
#[derive(Debug)]
pub struct PageResponse {
    pub url_final: Url,
    pub status: StatusCode,
    pub content_type: String,
    pub encoding: &'static Encoding,
    pub body_utf8: String,
    pub fetched_at: DateTime<Utc>,
}

impl PageResponse {
    pub fn charset(&self) -> &'static str {
        self.encoding.name()
    }
}
