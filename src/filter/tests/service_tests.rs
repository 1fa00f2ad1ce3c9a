//! Unit tests for the message filter service.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::filter::{
    adapters::function::FnPredicate,
    config::{EvaluationFailurePolicy, FilterConfig},
    domain::{Message, Payload, Verdict},
    error::{ConfigurationError, EvaluationError, FilterError},
    ports::predicate::{EvaluationContext, Predicate},
    services::{MessageFilter, PayloadNormalizer},
};
use rstest::rstest;
use tracing_test::traced_test;

fn filter_for(expression: &str, policy: EvaluationFailurePolicy) -> MessageFilter {
    MessageFilter::from_config(&FilterConfig::new(expression).with_failure_policy(policy))
        .expect("expression should compile")
}

#[rstest]
fn malformed_expressions_fail_construction() {
    let result = MessageFilter::from_config(&FilterConfig::new("payload.length >"));
    assert!(matches!(result, Err(ConfigurationError::UnexpectedEnd(_))));
}

#[rstest]
fn default_configuration_retains_text_unchanged() {
    let filter = MessageFilter::from_config(&FilterConfig::default()).expect("default compiles");
    let message = Message::builder("anything at all").build();

    let forwarded = filter.filter(message.clone()).expect("evaluation succeeds");

    assert_eq!(forwarded, Some(message));
}

#[rstest]
fn retained_messages_keep_their_original_payload() {
    let filter = filter_for("payload.length > 5", EvaluationFailurePolicy::Discard);
    let message = Message::builder(b"hello world".to_vec())
        .with_content_type("text/plain")
        .build();

    let forwarded = filter
        .filter(message.clone())
        .expect("evaluation succeeds")
        .expect("message retained");

    assert!(forwarded.payload().is_bytes());
    assert_eq!(forwarded, message);
}

#[rstest]
fn discarded_messages_are_dropped() {
    let filter = filter_for("payload.length > 5", EvaluationFailurePolicy::Discard);
    let forwarded = filter
        .filter(Message::builder("hi!").build())
        .expect("evaluation succeeds");
    assert_eq!(forwarded, None);
}

#[test]
#[traced_test]
fn failures_are_discarded_with_a_warning_by_default() {
    let filter = filter_for("headers.priority > 2", EvaluationFailurePolicy::Discard);

    let verdict = filter.decide(&Message::builder("hello").build());

    assert_eq!(verdict, Ok(Verdict::Discard));
    assert!(logs_contain("discarding message that failed evaluation"));
    assert!(logs_contain("header 'priority' is not present"));
}

#[rstest]
fn failures_propagate_when_configured() {
    let filter = filter_for("headers.priority > 2", EvaluationFailurePolicy::Propagate);

    let result = filter.filter(Message::builder("hello").build());

    assert_eq!(
        result,
        Err(FilterError::Evaluation(EvaluationError::MissingHeader(
            "priority".to_owned()
        )))
    );
}

#[rstest]
#[case(EvaluationFailurePolicy::Discard)]
#[case(EvaluationFailurePolicy::Propagate)]
fn raw_evaluation_ignores_the_policy(#[case] policy: EvaluationFailurePolicy) {
    let filter = filter_for("payload > 1", policy);
    let result = filter.evaluate(&Message::builder("hello").build());
    assert_eq!(
        result,
        Err(EvaluationError::type_mismatch(">", "text and integer"))
    );
}

#[test]
#[traced_test]
fn construction_is_logged() {
    let filter = filter_for("payload.length > 5", EvaluationFailurePolicy::Discard);

    assert_eq!(filter.predicate().source(), "payload.length > 5");
    assert!(logs_contain("message filter configured"));
}

#[rstest]
fn custom_predicates_see_the_normalized_payload() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let predicate = FnPredicate::new(move |context: &EvaluationContext<'_>| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(matches!(context.payload(), Payload::Text(text) if text == "hello"))
    });
    let filter = MessageFilter::new(
        Arc::new(predicate),
        PayloadNormalizer::default(),
        EvaluationFailurePolicy::Discard,
    );

    let textual = Message::builder(b"hello".to_vec())
        .with_content_type("text/plain")
        .build();
    let binary = Message::builder(b"hello".to_vec()).build();

    assert_eq!(filter.decide(&textual), Ok(Verdict::Retain));
    assert_eq!(filter.decide(&binary), Ok(Verdict::Discard));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[rstest]
fn trait_object_predicates_are_accepted() {
    let predicate: Arc<dyn Predicate> = Arc::new(FnPredicate::new(|context: &EvaluationContext<'_>| {
        Ok(context.headers().contains_key("priority"))
    }));
    let filter = MessageFilter::new(
        predicate,
        PayloadNormalizer::default(),
        EvaluationFailurePolicy::Propagate,
    );

    let flagged = Message::builder("hello").with_header("priority", 1_i64).build();

    assert_eq!(filter.decide(&flagged), Ok(Verdict::Retain));
    assert_eq!(
        filter.decide(&Message::builder("hello").build()),
        Ok(Verdict::Discard)
    );
}

#[rstest]
fn clones_share_the_compiled_predicate() {
    let filter = filter_for("true", EvaluationFailurePolicy::Propagate);
    let clone = filter.clone();

    assert!(std::ptr::eq(filter.predicate(), clone.predicate()));
    assert_eq!(clone.policy(), EvaluationFailurePolicy::Propagate);
    assert_eq!(clone.normalizer(), filter.normalizer());
}
