use crate::fetcher::types::PageResponse;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

const META_SNIFF_BYTES: usize = 4096;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

// <meta charset="..."> and <meta http-equiv="Content-Type" content="...; charset=...">
static META_CHARSETS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap(),
        Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap(),
    ]
});

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    content_type: String,
    body: &[u8],
) -> PageResponse {
    let encoding = detect_encoding(&content_type, body);
    let body_utf8 = decode_to_utf8(body, encoding, &url_final);

    PageResponse {
        url_final,
        status,
        content_type,
        encoding,
        body_utf8,
        fetched_at: Utc::now(),
    }
}

/// Header charset wins, then a `<meta>` declaration near the top of the
/// document, then byte-level guessing.
fn detect_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = label_from(&HEADER_CHARSET, content_type) {
        return encoding;
    }

    let head = &body[..body.len().min(META_SNIFF_BYTES)];
    let head_str = String::from_utf8_lossy(head);
    if let Some(encoding) = META_CHARSETS
        .iter()
        .find_map(|regex| label_from(regex, &head_str))
    {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, body.len() <= META_SNIFF_BYTES);
    detector.guess(None, true)
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_ascii_lowercase();
    Encoding::for_label(label.as_bytes())
}

/// Malformed sequences become U+FFFD; the page is still usable.
fn decode_to_utf8(body: &[u8], encoding: &'static Encoding, url: &Url) -> String {
    let (decoded, used, had_errors) = encoding.decode(body);
    if had_errors {
        warn!(%url, charset = used.name(), "body had malformed sequences; replaced");
    }
    decoded.into_owned()
}
