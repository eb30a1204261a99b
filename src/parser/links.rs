use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s+(?:[^>]*?\s+)?href=["']([^"']+)["'][^>]*>([^<]*)</a>"#).unwrap()
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub href: String,
    pub text: Option<String>,
}

/// Anchors in document order. Anchors whose text contains markup are skipped.
pub fn extract(markup: &str) -> Vec<Link> {
    ANCHOR_RE
        .captures_iter(markup)
        .filter_map(|caps| {
            let href = caps[1].trim();
            if href.is_empty() {
                return None;
            }
            let text = caps[2].trim();
            Some(Link {
                href: href.to_string(),
                text: (!text.is_empty()).then(|| text.to_string()),
            })
        })
        .collect()
}
