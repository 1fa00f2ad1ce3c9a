//! Text decoding applied to binary payloads.

use serde::{Deserialize, Serialize};

/// Character set used to decode text-like binary payloads.
///
/// Decoding is total: every byte sequence yields a string.
///
/// # Examples
///
/// ```
/// use filter_processor::filter::domain::TextCharset;
///
/// assert_eq!(TextCharset::Utf8.decode(b"caf\xc3\xa9"), "café");
/// assert_eq!(TextCharset::Latin1.decode(b"caf\xe9"), "café");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextCharset {
    /// UTF-8; invalid sequences decode to U+FFFD.
    #[default]
    #[serde(rename = "utf-8", alias = "utf8", alias = "UTF-8")]
    Utf8,
    /// ISO-8859-1; each byte maps to the code point of the same value.
    #[serde(rename = "iso-8859-1", alias = "latin1", alias = "ISO-8859-1")]
    Latin1,
}

impl TextCharset {
    /// Decodes `bytes` into a string.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Latin1 => bytes.iter().copied().map(char::from).collect(),
        }
    }
}
