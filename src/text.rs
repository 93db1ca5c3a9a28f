use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());

static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

static LINE_EDGES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]*\n[ \t]*").unwrap());

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Strips C0 control characters (keeping tab, newline and carriage return)
/// and DEL, then applies NFKC normalization.
pub fn clean_text(text: &str) -> String {
    CONTROL_CHARS.replace_all(text, "").nfkc().collect()
}

/// Collapses runs of spaces/tabs to one space and runs of blank lines to a
/// single blank line. Lines carry no leading or trailing spaces.
pub fn normalize_whitespace(text: &str) -> String {
    let spaced = HORIZONTAL_SPACE.replace_all(text.trim(), " ");
    let lines = LINE_EDGES.replace_all(&spaced, "\n");
    BLANK_LINES.replace_all(&lines, "\n\n").trim().to_string()
}

/// Truncates to at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
