//! Photo encoding for inline storage.
//!
//! Photos are kept inside the entry record as standard base64 text, so the
//! store never needs a separate blob location.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Encodes uploaded bytes. Empty uploads are treated as no photo.
pub fn encode_photo(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    Some(STANDARD.encode(bytes))
}

/// Decodes a stored photo back into its bytes.
pub fn decode_photo(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded.trim())
}

/// Image formats the uploader accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Png,
    Jpeg,
    Unknown,
}

impl PhotoFormat {
    /// Detects the format from the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            PhotoFormat::Png
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            PhotoFormat::Jpeg
        } else {
            PhotoFormat::Unknown
        }
    }

    /// File extension used when writing a decoded photo out.
    pub fn extension(self) -> &'static str {
        match self {
            PhotoFormat::Png => "png",
            PhotoFormat::Jpeg => "jpg",
            PhotoFormat::Unknown => "bin",
        }
    }
}

impl fmt::Display for PhotoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhotoFormat::Png => "png",
            PhotoFormat::Jpeg => "jpeg",
            PhotoFormat::Unknown => "unknown format",
        };
        f.write_str(name)
    }
}
