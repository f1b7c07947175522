//! Text decoding for exchange downloads.
//!
//! Order: UTF-8 with BOM, plain UTF-8, then Big5. The first that decodes
//! without replacement characters wins.

use std::fmt;

use encoding_rs::BIG5;
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Which decoder accepted the bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8Bom,
    Utf8,
    Big5,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub len: usize,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes are not valid utf-8-sig, utf-8, or big5",
            self.len
        )
    }
}

impl std::error::Error for DecodeError {}

/// Decode raw bytes to text, reporting which encoding matched.
pub fn decode_text(bytes: &[u8]) -> Result<(String, SourceEncoding), DecodeError> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        if let Ok(s) = std::str::from_utf8(rest) {
            return Ok((s.to_string(), SourceEncoding::Utf8Bom));
        }
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok((s.to_string(), SourceEncoding::Utf8));
    }

    match BIG5.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(s) => {
            debug!(len = bytes.len(), "decoded as big5");
            Ok((s.into_owned(), SourceEncoding::Big5))
        }
        None => Err(DecodeError { len: bytes.len() }),
    }
}
