//! Just enough HTML handling for the pages the tasks read.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid regex"));

/// Replaces the handful of entities the pages use.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Element text with tags removed, entities decoded and ends trimmed.
pub fn inner_text(fragment: &str) -> String {
    decode_entities(TAG.replace_all(fragment, "").trim())
}

/// Text after the element's last child tag, e.g. the question that follows a
/// `<br>` inside a paragraph.
pub fn last_text_node(fragment: &str) -> Option<String> {
    TAG.split(fragment)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .last()
        .map(decode_entities)
}

/// Value of `attr` in a single opening tag.
pub fn attribute(tag: &str, attr: &str) -> Option<String> {
    let pattern = format!(r#"(?i)(?:^|\s){}\s*=\s*["']([^"']*)["']"#, regex::escape(attr));
    Regex::new(&pattern)
        .ok()?
        .captures(tag)
        .map(|c| decode_entities(&c[1]))
}
