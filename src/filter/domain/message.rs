//! The message envelope evaluated by the filter.

use super::{CONTENT_TYPE_HEADER, HeaderValue, Headers, Payload};
use serde::{Deserialize, Serialize};

/// A message flowing through the filter stage.
///
/// Messages are immutable. Normalisation builds a new message through
/// [`Message::with_payload`] rather than editing the original.
///
/// # Examples
///
/// ```
/// use filter_processor::filter::domain::{Message, Payload};
///
/// let message = Message::builder(b"hello".to_vec())
///     .with_content_type("text/plain")
///     .with_header("priority", 3_i64)
///     .build();
///
/// assert!(message.payload().is_bytes());
/// assert_eq!(message.headers().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    payload: Payload,
    #[serde(default)]
    headers: Headers,
}

impl Message {
    /// Creates a message from a payload and a header mapping.
    #[must_use]
    pub fn new(payload: impl Into<Payload>, headers: Headers) -> Self {
        Self {
            payload: payload.into(),
            headers,
        }
    }

    /// Returns a builder for a message carrying `payload`.
    #[must_use]
    pub fn builder(payload: impl Into<Payload>) -> MessageBuilder {
        MessageBuilder {
            payload: payload.into(),
            headers: Headers::new(),
        }
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the declared `content-type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.headers.get(CONTENT_TYPE_HEADER)
    }

    /// Returns a new message with `payload` and a copy of these headers.
    #[must_use]
    pub fn with_payload(&self, payload: impl Into<Payload>) -> Self {
        Self {
            payload: payload.into(),
            headers: self.headers.clone(),
        }
    }

    /// Splits the message into its payload and headers.
    #[must_use]
    pub fn into_parts(self) -> (Payload, Headers) {
        (self.payload, self.headers)
    }
}

/// Builder for [`Message`].
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    payload: Payload,
    headers: Headers,
}

impl MessageBuilder {
    /// Adds a header, replacing any previous value under the same key.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Sets the `content-type` header.
    #[must_use]
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header(CONTENT_TYPE_HEADER, content_type.into())
    }

    /// Builds the message.
    #[must_use]
    pub fn build(self) -> Message {
        Message {
            payload: self.payload,
            headers: self.headers,
        }
    }
}
