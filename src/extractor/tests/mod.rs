use std::fs;

use crate::extractor::{ContentExtractor, ExtractorConfig, extract};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

/// Exactly `len` characters of prose with single spaces and no trailing
/// whitespace.
fn prose(len: usize) -> String {
    let text: String = "Faith precedes the miracle. "
        .repeat(len / 20 + 2)
        .chars()
        .take(len)
        .collect();
    assert!(!text.ends_with(' '), "pick a length that does not end on a space");
    text
}

#[test]
fn test_extract_talk() {
    let text = extract(&fixture("talk.html")).expect("talk should yield text");
    let text = text.as_str();

    assert!(text.contains("principle of action and of power"));
    assert!(text.contains("to trust Him even when we cannot see"));
    assert!(text.contains("everlasting life"));

    assert!(!text.contains("analyticsQueue"));
    assert!(!text.contains("dataset.loaded"));
    assert!(!text.contains("font-family"));
    assert!(!text.contains("Site Header Banner"));
    assert!(!text.contains("Study Library"));
    assert!(!text.contains("Intellectual Reserve"));
    // outside every recognised container
    assert!(!text.contains("Related Content"));
}

#[test]
fn test_extract_scripture_chapter() {
    let text = extract(&fixture("scripture.html")).expect("chapter should yield text");
    let text = text.as_str();

    assert!(text.contains("faith is not to have a perfect knowledge of things"));
    assert!(text.contains("\u{2014}"));
    assert!(!text.contains("Book of Mormon > Alma"));
    assert!(!text.contains("Privacy Notice"));
}

#[test]
fn test_extract_returns_none_for_shell_page() {
    assert!(extract(&fixture("empty.html")).is_none());
    assert!(extract("").is_none());
    assert!(extract("<html><body><p>tiny</p></body></html>").is_none());
}

#[test]
fn test_body_block_beats_surrounding_navigation() {
    let block = prose(150);
    let html = format!(
        r#"<html><body>
        <nav><ul><li>Home</li><li>Scriptures Navigation Menu</li></ul></nav>
        <div class="body-block">{block}</div>
        <div class="sidebar">Sidebar promotions shown beside the article body</div>
        </body></html>"#
    );

    let text = extract(&html).unwrap();
    assert_eq!(text.as_str(), block);
    assert!(!text.as_str().contains("Navigation Menu"));
}

#[test]
fn test_falls_through_to_body_lines() {
    let line_a = "Charity is the pure love of Christ, and it endureth forever.";
    let line_b = "Wherefore, my beloved brethren, pray unto the Father with all the energy of heart.";
    let html = format!(
        "<html><body><div>{line_a}</div><div>Short line</div><section>{line_b}</section><p>Brief note.</p></body></html>"
    );

    let text = extract(&html).unwrap();
    assert_eq!(text.as_str(), format!("{line_a}\n\n{line_b}"));
}

#[test]
fn test_falls_back_to_paragraphs() {
    let html = r#"<html><body>
        <nav><p>This navigation paragraph is long enough to pass the paragraph filter.</p></nav>
        <div class="unknown-layout">
          <p>Repentance is a change of mind and heart that brings a fresh view about God.</p>
          <p>Short aside.</p>
          <p>It includes turning away from sin and turning toward God for forgiveness.</p>
        </div>
        </body></html>"#;

    let text = extract(html).unwrap();
    assert_eq!(
        text.as_str(),
        "Repentance is a change of mind and heart that brings a fresh view about God.\n\n\
         It includes turning away from sin and turning toward God for forgiveness."
    );
}

#[test]
fn test_output_is_capped() {
    let html = format!("<div class=\"article-body\">{}</div>", prose(30_001));
    let text = extract(&html).unwrap();
    assert_eq!(text.char_len(), 10_000);
}

#[test]
fn test_whitespace_and_control_characters_normalised() {
    let html = "<div class=\"content-body\">Line   with\t\tspaces and a \u{0007}bell, \
                plus enough additional words to clear the one hundred character threshold easily.\
                <br><br><br>Second line after breaks.</div>";
    let text = extract(html).unwrap();
    let text = text.as_str();

    assert!(text.starts_with("Line with spaces and a bell,"));
    assert!(!text.contains('\u{0007}'));
    assert!(!text.contains("  "));
    assert!(text.ends_with("\nSecond line after breaks."));
}

#[test]
fn test_extract_is_idempotent() {
    let html = fixture("talk.html");
    let extractor = ContentExtractor::default();
    assert_eq!(extractor.extract(&html), extractor.extract(&html));
    assert_eq!(extract(&html), extractor.extract(&html));
}

#[test]
fn test_malformed_html() {
    let html = format!(
        "<html><head><title>Broken</title><body><div class=\"verse\">{}<p>Unclosed tags<div>More content",
        prose(120)
    );
    let text = extract(&html).expect("parser should recover from unclosed tags");
    assert!(text.as_str().contains("Unclosed tags"));
}

#[test]
fn test_custom_config_with_broken_selector() {
    let config = ExtractorConfig {
        content_selectors: vec!["section[[".to_string(), ".talk".to_string()],
        max_chars: 40,
        ..ExtractorConfig::default()
    };
    let extractor = ContentExtractor::new(config);
    let html = format!("<section class=\"talk\">{}</section>", prose(200));

    let text = extractor.extract(&html).unwrap();
    assert_eq!(text.as_str(), &prose(200)[..40]);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = extract(&html);
        }

        #[test]
        fn test_extract_bounded_and_idempotent(
            body in "[a-zA-Z <>/=\"]{0,400}",
            filler in "[a-z ]{101,300}",
        ) {
            let html = format!("<html><body><div class=\"body\">{filler}</div>{body}</body></html>");
            let first = extract(&html);
            if let Some(text) = &first {
                prop_assert!(text.char_len() <= 10_000);
            }
            prop_assert_eq!(first, extract(&html));
        }

        #[test]
        fn test_nav_text_never_leaks(secret in "[A-Z]{12}", filler in "[a-z]{5}( [a-z]{5}){30}") {
            let html = format!(
                "<body><nav>{secret}</nav><header>{secret}</header><div class=\"body\">{filler}</div><footer>{secret}</footer></body>"
            );
            if let Some(text) = extract(&html) {
                prop_assert!(!text.as_str().contains(&secret));
            }
        }
    }
}
