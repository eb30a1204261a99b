use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parser::classify::Classification;
use crate::parser::dialogue::DialogueTurn;
use crate::parser::links::Link;
use crate::parser::meta::{ExtractedMetadata, Platform};
use crate::parser::redact::Redacted;
use crate::parser::risk::ModerationFlag;

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\-]+").unwrap());
static UNDERSCORES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

const LANGUAGE: &str = "zh-Hant";
const CONTENT_CHARS: usize = 2000;
const SUMMARY_CHARS: usize = 180;
const NOTES_LABEL: &str = "個資遮蔽: ";

/// One archived post, ready to be written as JSON. Field order is the
/// on-disk key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub source_file: String,
    pub url: Option<String>,
    pub domain: Option<String>,
    pub board_or_category: Option<String>,
    pub title: Option<String>,
    pub author_display: Option<String>,
    pub timestamp_iso: Option<String>,
    pub language: &'static str,
    pub content_text: Option<String>,
    pub links_extracted: Vec<Link>,
    pub topic_primary: String,
    pub topic_secondary: Vec<String>,
    pub summary_150zh: String,
    pub moderation_flags: Vec<ModerationFlag>,
    pub dialogue_mock: Vec<DialogueTurn>,
    pub notes: String,
}

pub struct RecordParts {
    pub source_file: String,
    pub meta: ExtractedMetadata,
    pub redacted: Redacted,
    pub links: Vec<Link>,
    pub topics: Classification,
    pub flags: Vec<ModerationFlag>,
    pub dialogue: Vec<DialogueTurn>,
}

pub fn assemble(parts: RecordParts) -> OutputRecord {
    let RecordParts {
        source_file,
        meta,
        redacted,
        links,
        topics,
        flags,
        dialogue,
    } = parts;

    OutputRecord {
        source_file,
        url: meta.url,
        domain: meta.domain,
        board_or_category: meta.board_or_category,
        title: meta.title,
        author_display: meta.author_display,
        timestamp_iso: None,
        language: LANGUAGE,
        content_text: truncate_content(&redacted.text),
        links_extracted: links,
        topic_primary: topics.primary,
        topic_secondary: topics.secondary,
        summary_150zh: summarize(&redacted.text),
        moderation_flags: flags,
        dialogue_mock: dialogue,
        notes: redaction_notes(&redacted),
    }
}

fn truncate_content(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.chars().take(CONTENT_CHARS).collect())
    }
}

pub fn summarize(text: &str) -> String {
    let head: String = text.chars().take(SUMMARY_CHARS).collect();
    let mut summary = head.replace('\n', " ").trim().to_string();
    if text.chars().count() > SUMMARY_CHARS {
        summary.push_str("...");
    }
    summary
}

pub fn redaction_notes(redacted: &Redacted) -> String {
    if redacted.log.is_empty() {
        return String::new();
    }
    let kinds: Vec<&str> = redacted.log.iter().map(|k| k.as_str()).collect();
    format!("{}{}", NOTES_LABEL, kinds.join(", "))
}

/// Lowercase, runs of non-word characters to `_`, no leading/trailing `_`.
pub fn slugify(stem: &str) -> String {
    let lower = stem.to_lowercase();
    let replaced = NON_SLUG_RE.replace_all(&lower, "_");
    let collapsed = UNDERSCORES_RE.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

fn platform_short(domain: Option<&str>) -> &'static str {
    domain
        .and_then(Platform::sniff)
        .map(Platform::as_str)
        .unwrap_or("unknown")
}

/// `{platform}__{slug}__.json`, platform taken from the record's domain.
pub fn output_filename(source_file: &str, domain: Option<&str>) -> String {
    let stem = Path::new(source_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}__{}__.json", platform_short(domain), slugify(&stem))
}

impl OutputRecord {
    pub fn filename(&self) -> String {
        output_filename(&self.source_file, self.domain.as_deref())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::redact::RedactionKind;

    #[test]
    fn slug_is_idempotent() {
        for stem in ["Hello World!!", "碩二 想休學 (1)", "__a--b__", "ptt__M.1700.A.1F2", ""] {
            let once = slugify(stem);
            assert_eq!(slugify(&once), once, "stem {:?}", stem);
        }
    }

    #[test]
    fn slug_shapes() {
        assert_eq!(slugify("Hello World!!"), "hello_world");
        assert_eq!(slugify("碩二 想休學 (1)"), "碩二_想休學_1");
        assert_eq!(slugify("M.1700000000.A.1F2"), "m_1700000000_a_1f2");
        assert_eq!(slugify("a - b"), "a_-_b");
    }

    #[test]
    fn filename_uses_domain_platform() {
        assert_eq!(
            output_filename("Post One.html", Some("www.ptt.cc")),
            "ptt__post_one__.json"
        );
        assert_eq!(
            output_filename("dir/x.htm", Some("www.dcard.tw")),
            "dcard__x__.json"
        );
        assert_eq!(output_filename("x.html", None), "unknown__x__.json");
        assert_eq!(output_filename("x.html", Some("example.org")), "unknown__x__.json");
    }

    #[test]
    fn summary_ellipsis_only_when_long() {
        assert_eq!(summarize("第一行\n第二行"), "第一行 第二行");
        let long = "長".repeat(181);
        let s = summarize(&long);
        assert_eq!(s, format!("{}...", "長".repeat(180)));
        assert_eq!(summarize(&"長".repeat(180)), "長".repeat(180));
        assert_eq!(summarize(""), "");
    }

    #[test]
    fn notes_list_kinds() {
        let r = Redacted {
            text: String::new(),
            log: vec![RedactionKind::StudentId, RedactionKind::Email],
        };
        assert_eq!(redaction_notes(&r), "個資遮蔽: student_id, email");
        assert_eq!(redaction_notes(&Redacted::default()), "");
    }

    #[test]
    fn content_is_capped_and_null_when_empty() {
        assert_eq!(truncate_content(""), None);
        let long = "文".repeat(2500);
        assert_eq!(truncate_content(&long).unwrap().chars().count(), 2000);
    }
}
