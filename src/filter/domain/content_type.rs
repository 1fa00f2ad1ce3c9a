//! Content-type resolution and text classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Header key holding the payload's content type.
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// Content type assumed when a message declares none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Substrings that mark a content type as text-like.
///
/// Matching is case-sensitive containment; any single marker suffices.
pub const TEXT_MARKERS: [&str; 3] = ["text", "json", "x-spring-tuple"];

/// A MIME-type-like content type string.
///
/// The value is kept verbatim; no MIME parsing or case folding takes place.
///
/// # Examples
///
/// ```
/// use filter_processor::filter::domain::ContentType;
///
/// assert!(ContentType::new("application/json;charset=UTF-8").is_textual());
/// assert!(ContentType::new("application/x-spring-tuple").is_textual());
/// assert!(!ContentType::default().is_textual());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    /// Creates a content type from its string form.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the content type as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this content type describes text-like data.
    #[must_use]
    pub fn is_textual(&self) -> bool {
        Self::mentions_text_marker(&self.0)
    }

    /// Returns `true` if `value` contains any of the [`TEXT_MARKERS`].
    #[must_use]
    pub fn mentions_text_marker(value: &str) -> bool {
        TEXT_MARKERS.iter().any(|marker| value.contains(marker))
    }
}

impl Default for ContentType {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_TYPE)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        Self(value)
    }
}
