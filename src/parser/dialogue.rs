use serde::Serialize;

const DEFAULT_OPENING_CRISIS: &str = "我最近遇到了很困擾的問題";
const DEFAULT_OPENING: &str = "我最近感到很困擾";
const REPLY_CRISIS: &str = "我聽到你的困擾。如果你現在感到非常難受，請聯絡學校心理諮商服務或撥打各地心理健康支持專線。我們可以一起討論如何度過這段艱難時期。";
const REPLY: &str = "謝謝你的分享。我理解這對你來說可能很挑戰。能否告訴我更多細節，讓我更好地理解你的情況？";
const CLOSING: &str = "我理解這些挑戰確實會帶來壓力。許多學生都有類似的經歷。你可以考慮和朋友、家人或專業輔導員談論這些感受。";
const EXCERPT_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueTurn {
    pub role: Role,
    pub text: String,
}

impl DialogueTurn {
    fn user(text: impl Into<String>) -> Self {
        DialogueTurn {
            role: Role::User,
            text: text.into(),
        }
    }

    fn assistant(text: impl Into<String>) -> Self {
        DialogueTurn {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Four fixed turns seeded by title, redacted content and the crisis flag.
pub fn synthesize(title: Option<&str>, content: &str, has_crisis: bool) -> Vec<DialogueTurn> {
    let (default_opening, reply) = if has_crisis {
        (DEFAULT_OPENING_CRISIS, REPLY_CRISIS)
    } else {
        (DEFAULT_OPENING, REPLY)
    };
    let excerpt: String = content.chars().take(EXCERPT_CHARS).collect();

    vec![
        DialogueTurn::user(title.unwrap_or(default_opening)),
        DialogueTurn::assistant(reply),
        DialogueTurn::user(format!("嗯，主要是因為{}...", excerpt)),
        DialogueTurn::assistant(CLOSING),
    ]
}
