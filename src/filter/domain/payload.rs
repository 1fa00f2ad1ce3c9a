//! Message payload representation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The body of a message.
///
/// Transports usually deliver raw bytes; upstream stages may already have
/// decoded the body into text or a structured JSON value.
///
/// # Serialisation
///
/// Payloads are serialised with a `kind` tag:
///
/// ```json
/// { "kind": "text", "value": "hello" }
/// { "kind": "bytes", "value": [104, 105] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Payload {
    /// Undecoded bytes as received from the transport.
    Bytes(Vec<u8>),
    /// Decoded text.
    Text(String),
    /// A decoded structured value.
    Json(Value),
}

impl Payload {
    /// Returns `true` if the payload is still raw bytes.
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes(_))
    }

    /// Returns the raw bytes, if the payload is binary.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the text, if the payload has been decoded to text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns a short name for the payload kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Json(_) => "json",
        }
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
