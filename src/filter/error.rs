//! Error types for filter configuration and evaluation.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers. Configuration failures happen once,
//! while a filter is built; evaluation failures are per message.

use thiserror::Error;

/// Errors raised while building a filter from its configuration.
///
/// These are fatal: a filter that cannot be configured must not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The filter expression is empty or whitespace-only.
    #[error("filter expression cannot be empty")]
    EmptyExpression,

    /// The expression contains an unexpected character or token.
    #[error("syntax error at offset {offset}: {reason}")]
    Syntax {
        /// Byte offset of the offending token.
        offset: usize,
        /// Description of the problem.
        reason: String,
    },

    /// The expression ended while more input was expected.
    #[error("unexpected end of expression: {0}")]
    UnexpectedEnd(String),

    /// A bare identifier is neither a root binding nor a keyword.
    #[error("unknown identifier '{0}': expressions may only reference 'payload' and 'headers'")]
    UnknownIdentifier(String),

    /// A function call names a function the dialect does not provide.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// A function was called with the wrong number of arguments.
    #[error("function '{function}' expects {expected} argument(s), found {actual}")]
    Arity {
        /// Function name.
        function: String,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// A literal JSONPath argument does not parse.
    #[error("invalid JSONPath '{path}': {reason}")]
    InvalidJsonPath {
        /// The path as written.
        path: String,
        /// Description of the problem.
        reason: String,
    },

    /// The expression nests deeper than the parser allows.
    #[error("expression nesting exceeds the limit of {limit}")]
    NestingTooDeep {
        /// The maximum nesting depth.
        limit: usize,
    },

    /// A configuration file could not be read.
    #[error("failed to read configuration '{path}': {reason}")]
    Read {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// A configuration document is malformed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigurationError {
    /// Creates a syntax error at `offset`.
    #[must_use]
    pub fn syntax(offset: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates an unexpected-end error.
    #[must_use]
    pub fn unexpected_end(expected: impl Into<String>) -> Self {
        Self::UnexpectedEnd(expected.into())
    }
}

/// Errors raised while evaluating a compiled predicate against one message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The expression reads a header the message does not carry.
    #[error("header '{0}' is not present")]
    MissingHeader(String),

    /// The expression reads a property the value does not have.
    #[error("no property '{property}' on {target}")]
    NoSuchProperty {
        /// The property name.
        property: String,
        /// Type of the value the property was read from.
        target: &'static str,
    },

    /// A member was called with the wrong number of arguments.
    #[error("'{member}' expects {expected} argument(s), found {actual}")]
    InvalidArguments {
        /// The member name.
        member: String,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// An operator or member does not accept the operand types.
    #[error("'{operation}' cannot be applied to {found}")]
    TypeMismatch {
        /// The operator or member.
        operation: String,
        /// Description of the operand types.
        found: String,
    },

    /// The expression result cannot be coerced to a boolean.
    #[error("expression produced {0}, expected a boolean")]
    NotBoolean(&'static str),

    /// A JSONPath selected nothing.
    #[error("JSONPath '{0}' matched nothing")]
    PathNotFound(String),

    /// A JSONPath computed at evaluation time does not parse.
    #[error("invalid JSONPath '{path}': {reason}")]
    InvalidJsonPath {
        /// The path as evaluated.
        path: String,
        /// Description of the problem.
        reason: String,
    },

    /// The JSONPath source is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    /// An index lies outside the indexed value.
    #[error("index {index} is out of bounds for length {length}")]
    IndexOutOfBounds {
        /// The requested index.
        index: i64,
        /// Length of the indexed value.
        length: usize,
    },

    /// Integer arithmetic overflowed.
    #[error("arithmetic overflow in '{0}'")]
    ArithmeticOverflow(&'static str),

    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
}

impl EvaluationError {
    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(operation: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            operation: operation.into(),
            found: found.into(),
        }
    }

    /// Creates a missing-property error.
    #[must_use]
    pub fn no_such_property(property: impl Into<String>, target: &'static str) -> Self {
        Self::NoSuchProperty {
            property: property.into(),
            target,
        }
    }
}

/// Errors surfaced by the filter service to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Evaluation failed and the policy asks for the failure to propagate.
    #[error("filter evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
}
