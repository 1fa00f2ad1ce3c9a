//! Predicates backed by native Rust closures.

use std::fmt;

use crate::filter::ports::predicate::{EvaluationContext, EvaluationResult, Predicate};

/// Adapts a closure into a [`Predicate`].
///
/// # Examples
///
/// ```
/// use filter_processor::filter::adapters::function::FnPredicate;
/// use filter_processor::filter::domain::Message;
/// use filter_processor::filter::ports::predicate::{EvaluationContext, Predicate};
///
/// let has_priority = FnPredicate::new(|context| Ok(context.headers().contains_key("priority")));
/// let message = Message::builder("hello").with_header("priority", 1_i64).build();
///
/// assert_eq!(
///     has_priority.evaluate(&EvaluationContext::from_message(&message)),
///     Ok(true)
/// );
/// ```
pub struct FnPredicate<F> {
    function: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&EvaluationContext<'_>) -> EvaluationResult<bool> + Send + Sync,
{
    /// Wraps `function`.
    #[must_use]
    pub const fn new(function: F) -> Self {
        Self { function }
    }
}

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&EvaluationContext<'_>) -> EvaluationResult<bool> + Send + Sync,
{
    fn evaluate(&self, context: &EvaluationContext<'_>) -> EvaluationResult<bool> {
        (self.function)(context)
    }
}

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate").finish_non_exhaustive()
    }
}
