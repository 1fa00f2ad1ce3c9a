//! Unit tests for filter configuration parsing.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::filter::{
    config::{DEFAULT_EXPRESSION, EvaluationFailurePolicy, FilterConfig},
    domain::{DEFAULT_CONTENT_TYPE, TextCharset},
    error::ConfigurationError,
};
use rstest::rstest;

#[rstest]
fn defaults_retain_everything_and_assume_binary() {
    let config = FilterConfig::default();

    assert_eq!(config.expression, DEFAULT_EXPRESSION);
    assert_eq!(config.content_type.as_str(), DEFAULT_CONTENT_TYPE);
    assert_eq!(config.charset, TextCharset::Utf8);
    assert_eq!(config.on_evaluation_error, EvaluationFailurePolicy::Discard);
}

#[rstest]
fn every_setting_is_read_from_the_filter_table() {
    let config = FilterConfig::from_toml_str(
        r#"
        [filter]
        expression = "headers.priority > 2"
        content-type = "text/plain"
        charset = "iso-8859-1"
        on-evaluation-error = "propagate"
        "#,
    )
    .expect("valid configuration");

    assert_eq!(
        config,
        FilterConfig::new("headers.priority > 2")
            .with_content_type("text/plain")
            .with_charset(TextCharset::Latin1)
            .with_failure_policy(EvaluationFailurePolicy::Propagate)
    );
}

#[rstest]
#[case("")]
#[case("[filter]\n")]
#[case("[transport]\nbinding = \"input\"\n")]
fn absent_settings_fall_back_to_defaults(#[case] document: &str) {
    let config = FilterConfig::from_toml_str(document).expect("valid configuration");
    assert_eq!(config, FilterConfig::default());
}

#[rstest]
#[case("[filter]\nexpresion = \"true\"\n")]
#[case("[filter]\ncharset = \"ebcdic\"\n")]
#[case("[filter]\non-evaluation-error = \"retry\"\n")]
#[case("[filter\n")]
fn malformed_documents_are_rejected(#[case] document: &str) {
    let result = FilterConfig::from_toml_str(document);
    assert!(
        matches!(result, Err(ConfigurationError::Invalid(_))),
        "unexpected result: {result:?}"
    );
}

#[rstest]
fn missing_files_report_the_path() {
    let dir = Dir::open_ambient_dir(env!("CARGO_MANIFEST_DIR"), ambient_authority())
        .expect("manifest directory should open");

    let result = FilterConfig::load(&dir, Utf8Path::new("no-such-filter.toml"));

    assert!(
        matches!(&result, Err(ConfigurationError::Read { path, .. }) if path == "no-such-filter.toml"),
        "unexpected result: {result:?}"
    );
}
