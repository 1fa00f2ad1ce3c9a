//! Shared world state for message filtering BDD scenarios.

use filter_processor::filter::{
    config::{EvaluationFailurePolicy, FilterConfig},
    domain::Message,
    error::{ConfigurationError, FilterError},
    services::MessageFilter,
};
use rstest::fixture;

/// Scenario world for message filtering behaviour tests.
#[derive(Default)]
pub struct FilterWorld {
    /// The filter under test.
    pub filter: Option<MessageFilter>,
    /// The last message handed to the filter.
    pub sent: Option<Message>,
    /// Outcome of the last `filter` call.
    pub outcome: Option<Result<Option<Message>, FilterError>>,
    /// Error from the last failed configuration attempt.
    pub configuration_error: Option<ConfigurationError>,
}

impl FilterWorld {
    /// Builds the filter for `expression` with `policy`.
    pub fn configure(
        &mut self,
        expression: &str,
        policy: EvaluationFailurePolicy,
    ) -> Result<(), ConfigurationError> {
        let config = FilterConfig::new(expression).with_failure_policy(policy);
        self.filter = Some(MessageFilter::from_config(&config)?);
        Ok(())
    }

    /// Filters `message`, recording it and the outcome.
    pub fn send(&mut self, message: Message) -> Result<(), eyre::Report> {
        let filter = self
            .filter
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no filter configured in scenario world"))?;
        self.outcome = Some(filter.filter(message.clone()));
        self.sent = Some(message);
        Ok(())
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> FilterWorld {
    FilterWorld::default()
}
