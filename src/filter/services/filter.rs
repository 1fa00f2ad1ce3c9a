//! The filter stage: normalize, evaluate, decide.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::filter::{
    adapters::expression::ExpressionPredicate,
    config::{EvaluationFailurePolicy, FilterConfig},
    domain::{Message, Verdict},
    error::{ConfigurationError, EvaluationError, FilterError},
    ports::predicate::{EvaluationContext, Predicate},
    services::PayloadNormalizer,
};

/// Decides, message by message, whether to retain or discard.
///
/// The predicate is shared behind an [`Arc`]; cloning a filter is cheap and
/// every clone can run on its own thread.
///
/// # Examples
///
/// ```
/// use filter_processor::filter::config::FilterConfig;
/// use filter_processor::filter::domain::{Message, Verdict};
/// use filter_processor::filter::services::MessageFilter;
///
/// let filter = MessageFilter::from_config(&FilterConfig::new("payload.length > 5"))
///     .expect("valid expression");
///
/// assert_eq!(filter.decide(&Message::builder("hello").build()), Ok(Verdict::Discard));
/// assert_eq!(filter.decide(&Message::builder("hello world").build()), Ok(Verdict::Retain));
/// ```
#[derive(Debug)]
pub struct MessageFilter<P = ExpressionPredicate>
where
    P: Predicate + ?Sized,
{
    predicate: Arc<P>,
    normalizer: PayloadNormalizer,
    policy: EvaluationFailurePolicy,
}

impl MessageFilter<ExpressionPredicate> {
    /// Builds a filter from its configuration, compiling the expression.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the expression does not compile.
    pub fn from_config(config: &FilterConfig) -> Result<Self, ConfigurationError> {
        let predicate = ExpressionPredicate::compile(&config.expression)?;
        info!(
            expression = predicate.source(),
            default_content_type = %config.content_type,
            charset = ?config.charset,
            policy = ?config.on_evaluation_error,
            "message filter configured"
        );
        Ok(Self::new(
            Arc::new(predicate),
            PayloadNormalizer::from_config(config),
            config.on_evaluation_error,
        ))
    }
}

impl<P> MessageFilter<P>
where
    P: Predicate + ?Sized,
{
    /// Creates a filter around an already constructed predicate.
    #[must_use]
    pub const fn new(
        predicate: Arc<P>,
        normalizer: PayloadNormalizer,
        policy: EvaluationFailurePolicy,
    ) -> Self {
        Self {
            predicate,
            normalizer,
            policy,
        }
    }

    /// Returns the predicate.
    #[must_use]
    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    /// Returns the payload normalizer.
    #[must_use]
    pub const fn normalizer(&self) -> &PayloadNormalizer {
        &self.normalizer
    }

    /// Returns the evaluation failure policy.
    #[must_use]
    pub const fn policy(&self) -> EvaluationFailurePolicy {
        self.policy
    }

    /// Normalizes `message` and evaluates the predicate against it.
    ///
    /// No failure policy is applied.
    ///
    /// # Errors
    ///
    /// Returns the predicate's [`EvaluationError`] unchanged.
    pub fn evaluate(&self, message: &Message) -> Result<Verdict, EvaluationError> {
        let normalized = self.normalizer.normalize(message);
        self.predicate
            .evaluate(&EvaluationContext::from_message(&normalized))
            .map(Verdict::from)
    }

    /// Evaluates `message` and applies the failure policy.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Evaluation`] only when evaluation fails and the
    /// policy is [`EvaluationFailurePolicy::Propagate`].
    pub fn decide(&self, message: &Message) -> Result<Verdict, FilterError> {
        match self.evaluate(message) {
            Ok(verdict) => {
                debug!(%verdict, payload = message.payload().kind(), "message evaluated");
                Ok(verdict)
            }
            Err(error) => match self.policy {
                EvaluationFailurePolicy::Discard => {
                    warn!(%error, "discarding message that failed evaluation");
                    Ok(Verdict::Discard)
                }
                EvaluationFailurePolicy::Propagate => Err(FilterError::Evaluation(error)),
            },
        }
    }

    /// Filters `message`, handing it back unchanged when it is retained.
    ///
    /// # Errors
    ///
    /// Same as [`MessageFilter::decide`].
    pub fn filter(&self, message: Message) -> Result<Option<Message>, FilterError> {
        let verdict = self.decide(&message)?;
        Ok(verdict.is_retained().then_some(message))
    }
}

impl<P> Clone for MessageFilter<P>
where
    P: Predicate + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            normalizer: self.normalizer.clone(),
            policy: self.policy,
        }
    }
}
