use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9_]+").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[0-9]{2,4}[-.\s]?)*[0-9]{4}[-.\s]?[0-9]{4}").unwrap());

const MASK: &str = "***";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionKind {
    StudentId,
    Email,
    Phone,
}

impl RedactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RedactionKind::StudentId => "student_id",
            RedactionKind::Email => "email",
            RedactionKind::Phone => "phone",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Redacted {
    pub text: String,
    pub log: Vec<RedactionKind>,
}

fn head_tail(s: &str, head: usize, tail: usize) -> (String, String) {
    let chars: Vec<char> = s.chars().collect();
    let h: String = chars.iter().take(head).collect();
    let t: String = chars[chars.len().saturating_sub(tail)..].iter().collect();
    (h, t)
}

fn is_student_id(token: &str) -> bool {
    (8..=10).contains(&token.len()) && token.bytes().all(|b| b.is_ascii_digit())
}

fn mask_student_ids(text: &str) -> Option<String> {
    if !WORD_RE.find_iter(text).any(|m| is_student_id(m.as_str())) {
        return None;
    }
    let masked = WORD_RE.replace_all(text, |c: &Captures| {
        let token = &c[0];
        if is_student_id(token) {
            let (h, t) = head_tail(token, 2, 2);
            format!("{}{}{}", h, MASK, t)
        } else {
            token.to_string()
        }
    });
    Some(masked.into_owned())
}

fn mask_emails(text: &str) -> Option<String> {
    if !EMAIL_RE.is_match(text) {
        return None;
    }
    let masked = EMAIL_RE.replace_all(text, |c: &Captures| {
        let (local, domain) = c[0].split_once('@').unwrap_or((&c[0], ""));
        let (head, _) = head_tail(local, 2, 0);
        format!("{}{}@{}", head, MASK, domain)
    });
    Some(masked.into_owned())
}

fn mask_phones(text: &str) -> Option<String> {
    if !PHONE_RE.is_match(text) {
        return None;
    }
    let masked = PHONE_RE.replace_all(text, |c: &Captures| {
        let (h, t) = head_tail(&c[0], 2, 3);
        format!("{}{}{}", h, MASK, t)
    });
    Some(masked.into_owned())
}

/// Mask student ids, then emails, then phone numbers.
///
/// Ids go first; a 10 digit mobile number is therefore masked as an id and
/// the phone pass no longer sees it.
pub fn redact(text: &str) -> Redacted {
    let passes: [(RedactionKind, fn(&str) -> Option<String>); 3] = [
        (RedactionKind::StudentId, mask_student_ids),
        (RedactionKind::Email, mask_emails),
        (RedactionKind::Phone, mask_phones),
    ];

    let mut out = Redacted {
        text: text.to_string(),
        log: Vec::new(),
    };
    for (kind, pass) in passes {
        if let Some(masked) = pass(&out.text) {
            out.text = masked;
            out.log.push(kind);
        }
    }
    out
}
