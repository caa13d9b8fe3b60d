//! HTML to plain text conversion

use scraper::{Html, Node};

/// Elements whose text never reaches the output
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Strip markup from an HTML document and return its visible text.
///
/// Script and style contents are dropped, entities are decoded by the
/// parser, and runs of whitespace collapse to a single space.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        raw.push_str(text);
        raw.push(' ');
    }

    collapse_whitespace(&raw)
}

/// Collapse all whitespace runs into single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
