//! Given steps for message filtering BDD scenarios.

use super::world::FilterWorld;
use eyre::WrapErr;
use filter_processor::filter::config::EvaluationFailurePolicy;
use rstest_bdd_macros::given;

#[given(r#"a filter with expression "{expression}""#)]
fn a_filter_with_expression(
    world: &mut FilterWorld,
    expression: String,
) -> Result<(), eyre::Report> {
    world
        .configure(&expression, EvaluationFailurePolicy::Discard)
        .wrap_err("configure discarding filter")
}

#[given(r#"a propagating filter with expression "{expression}""#)]
fn a_propagating_filter_with_expression(
    world: &mut FilterWorld,
    expression: String,
) -> Result<(), eyre::Report> {
    world
        .configure(&expression, EvaluationFailurePolicy::Propagate)
        .wrap_err("configure propagating filter")
}
