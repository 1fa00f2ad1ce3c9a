//! Content-type aware payload normalization.

use std::borrow::Cow;

use crate::filter::{
    config::FilterConfig,
    domain::{CONTENT_TYPE_HEADER, ContentType, HeaderValue, Headers, Message, Payload, TextCharset},
};

/// Decodes binary payloads whose content type is text-like.
///
/// Messages that need no decoding are returned borrowed; a decoded message
/// is a new value carrying the original headers.
///
/// # Examples
///
/// ```
/// use filter_processor::filter::domain::{Message, Payload};
/// use filter_processor::filter::services::PayloadNormalizer;
///
/// let normalizer = PayloadNormalizer::default();
/// let message = Message::builder(b"hello world".to_vec())
///     .with_content_type("text/plain")
///     .build();
///
/// let normalized = normalizer.normalize(&message);
/// assert_eq!(normalized.payload(), &Payload::Text("hello world".to_owned()));
/// assert_eq!(normalized.headers(), message.headers());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadNormalizer {
    default_content_type: ContentType,
    charset: TextCharset,
}

impl PayloadNormalizer {
    /// Creates a normalizer.
    #[must_use]
    pub const fn new(default_content_type: ContentType, charset: TextCharset) -> Self {
        Self {
            default_content_type,
            charset,
        }
    }

    /// Creates a normalizer from the content-type and charset settings.
    #[must_use]
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.content_type.clone(), config.charset)
    }

    /// Returns the content type assumed when a message declares none.
    #[must_use]
    pub const fn default_content_type(&self) -> &ContentType {
        &self.default_content_type
    }

    /// Returns the decoding charset.
    #[must_use]
    pub const fn charset(&self) -> TextCharset {
        self.charset
    }

    /// Returns `true` if `headers` resolve to a text-like content type.
    ///
    /// The `content-type` header wins when present, rendered as text if it
    /// holds another type; otherwise the default content type is used.
    #[must_use]
    pub fn is_textual(&self, headers: &Headers) -> bool {
        match headers.get(CONTENT_TYPE_HEADER) {
            Some(HeaderValue::Text(declared)) => ContentType::mentions_text_marker(declared),
            Some(declared) => ContentType::mentions_text_marker(&declared.to_string()),
            None => self.default_content_type.is_textual(),
        }
    }

    /// Normalizes `message` for evaluation.
    ///
    /// Only byte payloads with a text-like content type change; they are
    /// decoded with the configured charset. Normalizing an already
    /// normalized message is a no-op.
    #[must_use]
    pub fn normalize<'m>(&self, message: &'m Message) -> Cow<'m, Message> {
        let Payload::Bytes(bytes) = message.payload() else {
            return Cow::Borrowed(message);
        };
        if !self.is_textual(message.headers()) {
            return Cow::Borrowed(message);
        }
        Cow::Owned(message.with_payload(Payload::Text(self.charset.decode(bytes))))
    }
}
