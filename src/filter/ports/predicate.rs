//! Predicate port for message evaluation.
//!
//! Defines the abstract interface every filter predicate implements.

use crate::filter::{
    domain::{Headers, Message, Payload},
    error::EvaluationError,
};

/// Result type for evaluation operations.
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// The bindings a predicate evaluates against.
///
/// Exposes exactly the message payload and its headers.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    payload: &'a Payload,
    headers: &'a Headers,
}

impl<'a> EvaluationContext<'a> {
    /// Creates a context from its two bindings.
    #[must_use]
    pub const fn new(payload: &'a Payload, headers: &'a Headers) -> Self {
        Self { payload, headers }
    }

    /// Creates a context exposing `message`.
    #[must_use]
    pub const fn from_message(message: &'a Message) -> Self {
        Self::new(message.payload(), message.headers())
    }

    /// Returns the payload binding.
    #[must_use]
    pub const fn payload(&self) -> &'a Payload {
        self.payload
    }

    /// Returns the headers binding.
    #[must_use]
    pub const fn headers(&self) -> &'a Headers {
        self.headers
    }
}

/// Port for boolean message predicates.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Do all parsing and validation when they are constructed
/// - Be pure: the same context always yields the same result
/// - Be stateless and thread-safe, so one instance can be shared by every
///   worker delivering messages
pub trait Predicate: Send + Sync {
    /// Evaluates the predicate against `context`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] when the predicate cannot produce a
    /// boolean for this message.
    fn evaluate(&self, context: &EvaluationContext<'_>) -> EvaluationResult<bool>;
}
