//! Runtime values produced while evaluating an expression.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value as Json;

use crate::filter::{
    domain::{HeaderValue, Headers, Payload},
    error::EvaluationError,
};

/// A value borrowed from the message or the compiled expression where
/// possible; computed values are owned.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Value<'a> {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    /// A JSON array or object. JSON scalars are mapped to the variants above.
    Json(Cow<'a, Json>),
    Headers(&'a Headers),
}

impl<'a> Value<'a> {
    pub(super) fn from_payload(payload: &'a Payload) -> Self {
        match payload {
            Payload::Bytes(bytes) => Self::Bytes(Cow::Borrowed(bytes)),
            Payload::Text(text) => Self::Text(Cow::Borrowed(text)),
            Payload::Json(json) => Self::from_json_ref(json),
        }
    }

    pub(super) fn from_header(header: &'a HeaderValue) -> Self {
        match header {
            HeaderValue::Bool(value) => Self::Bool(*value),
            HeaderValue::Integer(value) => Self::Integer(*value),
            HeaderValue::Float(value) => Self::Float(*value),
            HeaderValue::Text(value) => Self::Text(Cow::Borrowed(value)),
            HeaderValue::Bytes(value) => Self::Bytes(Cow::Borrowed(value)),
        }
    }

    pub(super) fn from_json_ref(json: &'a Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(value) => Self::Bool(*value),
            Json::Number(number) => number_value(number),
            Json::String(text) => Self::Text(Cow::Borrowed(text)),
            Json::Array(_) | Json::Object(_) => Self::Json(Cow::Borrowed(json)),
        }
    }

    pub(super) fn from_json(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(value) => Self::Bool(value),
            Json::Number(number) => number_value(&number),
            Json::String(text) => Self::Text(Cow::Owned(text)),
            compound @ (Json::Array(_) | Json::Object(_)) => Self::Json(Cow::Owned(compound)),
        }
    }

    pub(super) fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Json(json) if json.is_array() => "JSON array",
            Self::Json(_) => "JSON object",
            Self::Headers(_) => "headers",
        }
    }

    /// Coerces the value to a boolean.
    ///
    /// Booleans pass through; the texts `true` and `false` are accepted in
    /// any ASCII case. Every other value is rejected.
    pub(super) fn to_bool(&self) -> Result<bool, EvaluationError> {
        match self {
            Self::Bool(value) => Ok(*value),
            Self::Text(text) if text.eq_ignore_ascii_case("true") => Ok(true),
            Self::Text(text) if text.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(EvaluationError::NotBoolean(other.type_name())),
        }
    }

    /// Renders a scalar for string concatenation.
    pub(super) fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => Some(Cow::Borrowed("null")),
            Self::Bool(value) => Some(Cow::Owned(value.to_string())),
            Self::Integer(value) => Some(Cow::Owned(value.to_string())),
            Self::Float(value) => Some(Cow::Owned(value.to_string())),
            Self::Text(text) => Some(Cow::Borrowed(text)),
            Self::Bytes(_) | Self::Json(_) | Self::Headers(_) => None,
        }
    }

    /// Equality across values; values of unrelated types are never equal.
    pub(super) fn loosely_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Integer(left), Self::Integer(right)) => left == right,
            (Self::Text(left), Self::Text(right)) => left == right,
            (Self::Bytes(left), Self::Bytes(right)) => left == right,
            (Self::Json(left), Self::Json(right)) => left == right,
            (Self::Headers(left), Self::Headers(right)) => left == right,
            (left, right) => match (left.as_float(), right.as_float()) {
                (Some(lhs), Some(rhs)) => lhs.partial_cmp(&rhs) == Some(Ordering::Equal),
                _ => false,
            },
        }
    }

    /// Orders two numbers or two texts; `None` for anything else.
    pub(super) fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => Some(left.cmp(right)),
            (Self::Text(left), Self::Text(right)) => Some(left.cmp(right)),
            (left, right) => left.as_float()?.partial_cmp(&right.as_float()?),
        }
    }

    pub(super) fn as_float(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(integer_to_float(*value)),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }
}

fn number_value<'a>(number: &serde_json::Number) -> Value<'a> {
    number.as_i64().map_or_else(
        || Value::Float(number.as_f64().unwrap_or(f64::NAN)),
        Value::Integer,
    )
}

#[expect(
    clippy::cast_precision_loss,
    reason = "mixed integer and float operands are compared in floating point"
)]
pub(super) fn integer_to_float(value: i64) -> f64 {
    value as f64
}
