pub mod classify;
pub mod dialogue;
pub mod extract;
pub mod lexicon;
pub mod links;
pub mod meta;
pub mod redact;
pub mod risk;

use tracing::debug;

use crate::decode::{DecodedDocument, RawDocument};
use crate::error::DocumentError;
use crate::record::{self, OutputRecord, RecordParts};
use lexicon::Lexicon;
use risk::ModerationFlag;

/// Linear pipeline: markup → metadata + text → redaction → topics/flags →
/// dialogue → record.
pub fn process_decoded(doc: &DecodedDocument, lexicon: &Lexicon) -> OutputRecord {
    let markup = doc.markup.as_str();

    let extracted = extract::extract_text(&doc.source_file, markup, lexicon);
    let meta = meta::extract(markup, extracted.title.as_deref(), lexicon);
    let redacted = redact::redact(&extracted.body);
    let topics = classify::classify_topic(meta.title.as_deref().unwrap_or(""), &redacted.text, lexicon);
    let links = links::extract(markup);
    let flags = risk::detect_flags(&redacted.text, lexicon);
    let has_crisis = flags.contains(&ModerationFlag::Crisis);
    let dialogue = dialogue::synthesize(meta.title.as_deref(), &redacted.text, has_crisis);

    debug!(
        file = %doc.source_file,
        encoding = ?doc.encoding,
        platform = ?meta.platform,
        article = extracted.saw_article,
        chars = redacted.text.chars().count(),
        redactions = redacted.log.len(),
        "document processed"
    );

    record::assemble(RecordParts {
        source_file: doc.source_file.clone(),
        meta,
        redacted,
        links,
        topics,
        flags,
        dialogue,
    })
}

/// Decode and process one document. Only decoding can fail here.
pub fn process_document(raw: &RawDocument, lexicon: &Lexicon) -> Result<OutputRecord, DocumentError> {
    let decoded = raw.decode()?;
    Ok(process_decoded(&decoded, lexicon))
}
