//! Then steps for message filtering BDD scenarios.

use super::world::FilterWorld;
use eyre::{Result, eyre};
use filter_processor::filter::error::{EvaluationError, FilterError};
use rstest_bdd_macros::then;

#[then("the message is retained unchanged")]
fn message_retained(world: &FilterWorld) -> Result<()> {
    let outcome = world
        .outcome
        .as_ref()
        .ok_or_else(|| eyre!("no message was filtered"))?;
    match outcome {
        Ok(Some(forwarded)) if Some(forwarded) == world.sent.as_ref() => Ok(()),
        other => Err(eyre!("expected the original message back, got {other:?}")),
    }
}

#[then("the message is discarded")]
fn message_discarded(world: &FilterWorld) -> Result<()> {
    match &world.outcome {
        Some(Ok(None)) => Ok(()),
        other => Err(eyre!("expected the message to be discarded, got {other:?}")),
    }
}

#[then(r#"filtering fails with a missing header "{name}""#)]
fn filtering_fails_with_missing_header(world: &FilterWorld, name: String) -> Result<()> {
    let expected = FilterError::Evaluation(EvaluationError::MissingHeader(name));
    match &world.outcome {
        Some(Err(error)) if *error == expected => Ok(()),
        other => Err(eyre!("expected {expected}, got {other:?}")),
    }
}

#[then("configuration fails")]
fn configuration_fails(world: &FilterWorld) -> Result<()> {
    if world.filter.is_some() {
        return Err(eyre!("expected no filter to be built"));
    }
    world
        .configuration_error
        .as_ref()
        .map(|_| ())
        .ok_or_else(|| eyre!("expected a configuration error"))
}
