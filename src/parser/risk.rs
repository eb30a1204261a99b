use serde::Serialize;

use super::lexicon::Lexicon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationFlag {
    Crisis,
    Harassment,
    Medical,
}

fn any_in(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|kw| !kw.is_empty() && haystack.contains(kw.to_lowercase().as_str()))
}

/// Flags in fixed order: crisis, harassment, medical. Runs on redacted text.
pub fn detect_flags(redacted: &str, lexicon: &Lexicon) -> Vec<ModerationFlag> {
    let lower = redacted.to_lowercase();
    [
        (ModerationFlag::Crisis, &lexicon.risk.crisis),
        (ModerationFlag::Harassment, &lexicon.risk.harassment),
        (ModerationFlag::Medical, &lexicon.risk.medical),
    ]
    .into_iter()
    .filter(|(_, keywords)| any_in(&lower, keywords))
    .map(|(flag, _)| flag)
    .collect()
}
