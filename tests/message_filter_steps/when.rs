//! When steps for message filtering BDD scenarios.

use super::world::FilterWorld;
use filter_processor::filter::{config::EvaluationFailurePolicy, domain::Message};
use rstest_bdd_macros::when;

#[when(r#"the text message "{text}" is filtered"#)]
fn text_message_filtered(world: &mut FilterWorld, text: String) -> Result<(), eyre::Report> {
    world.send(Message::builder(text).build())
}

#[when(r#"the bytes "{text}" with content type "{content_type}" are filtered"#)]
fn typed_bytes_filtered(
    world: &mut FilterWorld,
    text: String,
    content_type: String,
) -> Result<(), eyre::Report> {
    let message = Message::builder(text.into_bytes())
        .with_content_type(content_type)
        .build();
    world.send(message)
}

#[when(r#"the bytes "{text}" without a content type are filtered"#)]
fn untyped_bytes_filtered(world: &mut FilterWorld, text: String) -> Result<(), eyre::Report> {
    world.send(Message::builder(text.into_bytes()).build())
}

#[when(r#"a JSON document with foo set to "{value}" arrives as "{content_type}" bytes"#)]
fn json_document_filtered(
    world: &mut FilterWorld,
    value: String,
    content_type: String,
) -> Result<(), eyre::Report> {
    let document = serde_json::to_vec(&serde_json::json!({ "foo": value }))?;
    let message = Message::builder(document)
        .with_content_type(content_type)
        .build();
    world.send(message)
}

#[when(r#"a filter is configured with expression "{expression}""#)]
fn filter_configured(world: &mut FilterWorld, expression: String) {
    world.configuration_error = world
        .configure(&expression, EvaluationFailurePolicy::Discard)
        .err();
}
