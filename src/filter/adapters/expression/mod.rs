//! Predicates written in the filter expression dialect.
//!
//! Expressions are compiled once by [`ExpressionPredicate::compile`];
//! syntax errors, unknown functions and malformed literal JSONPath
//! arguments are reported then, never per message.
//!
//! # Dialect
//!
//! - Root bindings: `payload` and `headers`.
//! - Literals: integers, floats, `'single'` or `"double"` quoted strings,
//!   `true`, `false`, `null`. A `-` written directly before an integer is
//!   part of the literal, so `-9223372036854775808` is `i64::MIN`.
//! - Operators by increasing precedence: `||`/`or`, `&&`/`and`, `==` `!=`,
//!   `<` `<=` `>` `>=`, `+` `-`, `*` `/` `%`, then unary `!`/`not` and `-`.
//! - Members: `length`/`size`, `isEmpty`, `toUpperCase`, `toLowerCase`,
//!   `trim`, `contains(x)`, `startsWith(x)`, `endsWith(x)`, and
//!   `containsKey(x)` on headers. Empty parentheses are optional.
//! - Header access: `headers.name` or `headers['name']`. On headers and
//!   JSON objects `length`, `size` and `isEmpty` always mean the member, so
//!   a key with one of those names is read with brackets.
//! - Indexing with `[...]` into text, bytes, JSON arrays and objects.
//! - `jsonPath(source, path)`, also written `#jsonPath(...)`.
//!
//! # Examples
//!
//! ```
//! use filter_processor::filter::adapters::expression::ExpressionPredicate;
//! use filter_processor::filter::domain::Message;
//! use filter_processor::filter::ports::predicate::{EvaluationContext, Predicate};
//!
//! let predicate = ExpressionPredicate::compile("jsonPath(payload, '$.foo') == 'bar'")
//!     .expect("valid expression");
//! let message = Message::builder(r#"{"foo":"bar"}"#).build();
//!
//! let retained = predicate
//!     .evaluate(&EvaluationContext::from_message(&message))
//!     .expect("evaluation succeeds");
//! assert!(retained);
//! ```

mod ast;
mod interpreter;
mod json_path;
mod lexer;
mod parser;
mod value;

use std::fmt;
use std::str::FromStr;

pub use parser::MAX_NESTING;

use crate::filter::{
    error::ConfigurationError,
    ports::predicate::{EvaluationContext, EvaluationResult, Predicate},
};

/// A compiled filter expression.
///
/// Immutable after compilation; share it freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionPredicate {
    source: String,
    expr: ast::Expr,
}

impl ExpressionPredicate {
    /// Compiles `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the expression is empty, does not
    /// parse, references an unknown identifier or function, passes a
    /// malformed literal JSONPath, or nests deeper than [`MAX_NESTING`].
    pub fn compile(source: &str) -> Result<Self, ConfigurationError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::EmptyExpression);
        }
        let expr = parser::parse(trimmed)?;
        Ok(Self {
            source: trimmed.to_owned(),
            expr,
        })
    }

    /// Returns the expression as written, without surrounding whitespace.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Predicate for ExpressionPredicate {
    fn evaluate(&self, context: &EvaluationContext<'_>) -> EvaluationResult<bool> {
        interpreter::Interpreter::new(context.payload(), context.headers())
            .eval(&self.expr)?
            .to_bool()
    }
}

impl FromStr for ExpressionPredicate {
    type Err = ConfigurationError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::compile(source)
    }
}

impl fmt::Display for ExpressionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
