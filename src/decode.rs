use std::path::Path;

use crate::error::DocumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Big5,
    Latin1,
}

/// Tried in this order until one accepts the bytes.
pub const FALLBACK_CHAIN: &[SourceEncoding] = &[
    SourceEncoding::Utf8,
    SourceEncoding::Big5,
    SourceEncoding::Latin1,
];

impl SourceEncoding {
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            SourceEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_string)
            }
            SourceEncoding::Big5 => encoding_rs::BIG5
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|s| s.into_owned()),
            // Every byte is a valid code point; this never fails.
            SourceEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

/// One input file as read from disk.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source_file: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pub source_file: String,
    pub markup: String,
    pub encoding: SourceEncoding,
}

impl RawDocument {
    pub fn new(source_file: impl Into<String>, bytes: Vec<u8>) -> Self {
        RawDocument {
            source_file: source_file.into(),
            bytes,
        }
    }

    /// Read a file; `source_file` is its base name.
    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let source_file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(RawDocument::new(source_file, bytes))
    }

    pub fn decode(&self) -> Result<DecodedDocument, DocumentError> {
        self.decode_with(FALLBACK_CHAIN)
    }

    pub fn decode_with(&self, chain: &[SourceEncoding]) -> Result<DecodedDocument, DocumentError> {
        chain
            .iter()
            .find_map(|enc| {
                enc.decode(&self.bytes).map(|markup| DecodedDocument {
                    source_file: self.source_file.clone(),
                    markup,
                    encoding: *enc,
                })
            })
            .ok_or_else(|| DocumentError::Decode {
                file: self.source_file.clone(),
            })
    }
}
