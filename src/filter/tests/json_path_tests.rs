//! Unit tests for the `jsonPath` function and structured payloads.

use crate::filter::{
    adapters::expression::ExpressionPredicate,
    domain::Message,
    error::EvaluationError,
    ports::predicate::{EvaluationContext, EvaluationResult, Predicate},
};
use rstest::{fixture, rstest};
use serde_json::json;

const DOCUMENT: &str = r#"{
    "foo": "bar",
    "items": [1, 2, 3],
    "ratio": 1.5,
    "none": null,
    "nested": {
        "a b": true,
        "list": [{ "id": 7 }, { "id": 9 }]
    }
}"#;

fn evaluate(expression: &str, message: &Message) -> EvaluationResult<bool> {
    ExpressionPredicate::compile(expression)
        .expect("expression should compile")
        .evaluate(&EvaluationContext::from_message(message))
}

#[fixture]
fn document() -> Message {
    Message::builder(DOCUMENT)
        .with_header("path", "$.foo")
        .with_header("priority", 2_i64)
        .build()
}

#[rstest]
#[case("jsonPath(payload, '$.foo') == 'bar'")]
#[case("#jsonPath(payload, '$.foo') == 'bar'")]
#[case("jsonPath(payload, \"$['foo']\") == 'bar'")]
#[case("jsonPath(payload, '$.items[0]') == 1")]
#[case("jsonPath(payload, '$.items[-1]') == 3")]
#[case("jsonPath(payload, \"$.nested['a b']\")")]
#[case("jsonPath(payload, '$.nested.list[1].id') == 9")]
#[case("jsonPath(payload, '$.ratio') > 1")]
#[case("jsonPath(payload, '$.none') == null")]
#[case("jsonPath(payload, '$').foo == 'bar'")]
#[case("jsonPath(payload, '$.items').length() == 3")]
#[case("jsonPath(payload, '$.nested').containsKey('a b')")]
#[case("jsonPath(payload, '$.nested')['list'][0].id == 7")]
fn definite_paths_select_one_value(document: Message, #[case] source: &str) {
    assert_eq!(evaluate(source, &document), Ok(true), "'{source}' should hold");
}

#[rstest]
#[case("jsonPath(payload, '$.items[*]').size() == 3")]
#[case("jsonPath(payload, '$.nested.list[*].id')[1] == 9")]
#[case("jsonPath(payload, '$.nested.*').length == 2")]
#[case("jsonPath(payload, '$.foo[*]').isEmpty()")]
fn wildcards_collect_every_match(document: Message, #[case] source: &str) {
    assert_eq!(evaluate(source, &document), Ok(true), "'{source}' should hold");
}

#[rstest]
fn comparison_with_a_different_value_is_false(document: Message) {
    assert_eq!(
        evaluate("jsonPath(payload, '$.foo') == 'NotBar'", &document),
        Ok(false)
    );
}

#[rstest]
#[case("$.missing")]
#[case("$.foo.bar")]
#[case("$.items[3]")]
fn unmatched_definite_paths_fail(document: Message, #[case] path: &str) {
    let source = format!("jsonPath(payload, '{path}') == 1");
    assert_eq!(
        evaluate(&source, &document),
        Err(EvaluationError::PathNotFound(path.to_owned()))
    );
}

#[rstest]
fn indexing_a_selected_array_is_bounds_checked(document: Message) {
    assert_eq!(
        evaluate("jsonPath(payload, '$.items')[5] == 1", &document),
        Err(EvaluationError::IndexOutOfBounds {
            index: 5,
            length: 3,
        })
    );
}

#[rstest]
fn non_json_payloads_fail() {
    let message = Message::builder("not json").build();
    let result = evaluate("jsonPath(payload, '$.foo') == 'bar'", &message);
    assert!(
        matches!(result, Err(EvaluationError::InvalidJson(_))),
        "unexpected result: {result:?}"
    );
}

#[rstest]
fn byte_payloads_are_parsed_directly() {
    let message = Message::builder(br#"{"foo":"bar"}"#.to_vec()).build();
    assert_eq!(
        evaluate("jsonPath(payload, '$.foo') == 'bar'", &message),
        Ok(true)
    );
}

#[rstest]
fn structured_payloads_need_no_parsing() {
    let message = Message::builder(json!({ "foo": "bar", "items": [1, 2, 3] })).build();

    assert_eq!(evaluate("payload.foo == 'bar'", &message), Ok(true));
    assert_eq!(evaluate("payload.items.length == 3", &message), Ok(true));
    assert_eq!(
        evaluate("jsonPath(payload, '$.items[1]') == 2", &message),
        Ok(true)
    );
    assert_eq!(
        evaluate("payload.missing == 1", &message),
        Err(EvaluationError::no_such_property("missing", "JSON object"))
    );
}

#[rstest]
fn headers_are_not_a_json_source(document: Message) {
    assert_eq!(
        evaluate("jsonPath(headers, '$.path') == 1", &document),
        Err(EvaluationError::type_mismatch("jsonPath", "a headers source"))
    );
}

#[rstest]
fn paths_may_be_computed_per_message(document: Message) {
    assert_eq!(
        evaluate("jsonPath(payload, headers.path) == 'bar'", &document),
        Ok(true)
    );
}

#[rstest]
fn computed_paths_are_validated_per_message() {
    let message = Message::builder(DOCUMENT).with_header("path", "foo").build();
    let result = evaluate("jsonPath(payload, headers.path) == 'bar'", &message);
    assert!(
        matches!(&result, Err(EvaluationError::InvalidJsonPath { path, .. }) if path == "foo"),
        "unexpected result: {result:?}"
    );
}

#[rstest]
fn computed_paths_must_be_text(document: Message) {
    assert_eq!(
        evaluate("jsonPath(payload, headers.priority) == 'bar'", &document),
        Err(EvaluationError::type_mismatch("jsonPath", "a integer path"))
    );
}
