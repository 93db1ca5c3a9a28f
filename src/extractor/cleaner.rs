use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never belongs in an article body.
static BOILERPLATE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script, style, noscript, template, nav, header, footer").unwrap()
});

/// Detaches every boilerplate element from the tree and returns how many were
/// removed.
///
/// Detached nodes stay in the arena, so later queries must start from
/// [`Html::root_element`] rather than [`Html::select`], which walks every node.
pub fn strip_boilerplate(document: &mut Html) -> usize {
    let ids: Vec<_> = document
        .root_element()
        .select(&BOILERPLATE)
        .map(|element| element.id())
        .collect();

    for id in &ids {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.detach();
        }
    }
    ids.len()
}

/// Visible text of an element: text nodes trimmed, empties dropped, joined
/// with `separator`.
pub fn element_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_boilerplate_subtrees() {
        let mut document = Html::parse_document(
            r#"<html><head><style>p{color:red}</style><script>var secret = 1;</script></head>
            <body><header><h1>Site banner</h1></header>
            <nav><a href="/">Home</a><a href="/study/">Study</a></nav>
            <p>Kept paragraph</p>
            <footer>Copyright notice</footer></body></html>"#,
        );

        let removed = strip_boilerplate(&mut document);
        assert_eq!(removed, 5);

        let text = element_text(document.root_element(), " ");
        assert_eq!(text, "Kept paragraph");
    }

    #[test]
    fn test_nested_boilerplate_counts_each_match() {
        let mut document = Html::parse_document(
            "<body><header><nav>Menu</nav></header><main>Body text</main></body>",
        );
        assert_eq!(strip_boilerplate(&mut document), 2);
        assert_eq!(element_text(document.root_element(), "|"), "Body text");
    }

    #[test]
    fn test_element_text_joins_trimmed_nodes() {
        let document = Html::parse_fragment("<div>  one <b> two </b>\n\n three  </div>");
        let selector = Selector::parse("div").unwrap();
        let div = document.select(&selector).next().unwrap();
        assert_eq!(element_text(div, "\n"), "one\ntwo\nthree");
    }
}
