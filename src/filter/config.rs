//! Filter configuration.
//!
//! A [`FilterConfig`] is built once at start-up, either in code or from a
//! TOML document, and passed by reference into
//! [`crate::filter::services::MessageFilter::from_config`].
//!
//! ```toml
//! [filter]
//! expression = "payload.length() > 5"
//! content-type = "application/octet-stream"
//! charset = "utf-8"
//! on-evaluation-error = "discard"
//! ```

use camino::Utf8Path;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};

use crate::filter::{
    domain::{ContentType, TextCharset},
    error::ConfigurationError,
};

/// Expression used when none is configured; retains every message.
pub const DEFAULT_EXPRESSION: &str = "true";

/// What the filter does when a message cannot be evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationFailurePolicy {
    /// Log the failure and drop the message.
    #[default]
    Discard,
    /// Return the failure to the caller.
    Propagate,
}

/// Settings for one filter stage.
///
/// # Examples
///
/// ```
/// use filter_processor::filter::config::{EvaluationFailurePolicy, FilterConfig};
///
/// let config = FilterConfig::from_toml_str(
///     r#"
///     [filter]
///     expression = "payload.length > 5"
///     on-evaluation-error = "propagate"
///     "#,
/// )
/// .expect("valid configuration");
///
/// assert_eq!(config.expression, "payload.length > 5");
/// assert_eq!(config.on_evaluation_error, EvaluationFailurePolicy::Propagate);
/// assert_eq!(config.content_type.as_str(), "application/octet-stream");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FilterConfig {
    /// The boolean filter expression.
    pub expression: String,
    /// Content type assumed for messages without a `content-type` header.
    pub content_type: ContentType,
    /// Charset used to decode text-like binary payloads.
    pub charset: TextCharset,
    /// Handling of per-message evaluation failures.
    pub on_evaluation_error: EvaluationFailurePolicy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            expression: DEFAULT_EXPRESSION.to_owned(),
            content_type: ContentType::default(),
            charset: TextCharset::default(),
            on_evaluation_error: EvaluationFailurePolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    filter: FilterConfig,
}

impl FilterConfig {
    /// Creates a configuration with `expression` and default settings.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            ..Self::default()
        }
    }

    /// Sets the default content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<ContentType>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the decoding charset.
    #[must_use]
    pub const fn with_charset(mut self, charset: TextCharset) -> Self {
        self.charset = charset;
        self
    }

    /// Sets the evaluation failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, policy: EvaluationFailurePolicy) -> Self {
        self.on_evaluation_error = policy;
        self
    }

    /// Parses a TOML document with a `[filter]` table.
    ///
    /// A missing table yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Invalid`] if the document is not valid
    /// TOML or the `[filter]` table contains unknown keys.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigurationError> {
        toml::from_str::<ConfigDocument>(document)
            .map(|parsed| parsed.filter)
            .map_err(|error| ConfigurationError::Invalid(error.to_string()))
    }

    /// Reads and parses the TOML file at `path` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Read`] if the file cannot be read and
    /// [`ConfigurationError::Invalid`] if its contents do not parse.
    pub fn load(dir: &Dir, path: &Utf8Path) -> Result<Self, ConfigurationError> {
        let document = dir
            .read_to_string(path)
            .map_err(|error| ConfigurationError::Read {
                path: path.to_string(),
                reason: error.to_string(),
            })?;
        Self::from_toml_str(&document)
    }
}
