//! Tree-walking evaluation of a compiled expression.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value as Json;

use super::{
    ast::{BinaryOperator, Expr, Literal, PathArgument, Root, UnaryOperator},
    json_path::JsonPath,
    value::Value,
};
use crate::filter::{
    domain::{Headers, Payload},
    error::EvaluationError,
};

type Evaluated<'a> = Result<Value<'a>, EvaluationError>;

pub(super) struct Interpreter<'a> {
    payload: &'a Payload,
    headers: &'a Headers,
}

impl<'a> Interpreter<'a> {
    pub(super) const fn new(payload: &'a Payload, headers: &'a Headers) -> Self {
        Self { payload, headers }
    }

    pub(super) fn eval(&self, expr: &'a Expr) -> Evaluated<'a> {
        match expr {
            Expr::Literal(literal) => Ok(literal_value(literal)),
            Expr::Root(Root::Payload) => Ok(Value::from_payload(self.payload)),
            Expr::Root(Root::Headers) => Ok(Value::Headers(self.headers)),
            Expr::Member {
                target,
                name,
                arguments,
            } => {
                let receiver = self.eval(target)?;
                match arguments {
                    None => property(receiver, name),
                    Some(argument_exprs) => {
                        let values = argument_exprs
                            .iter()
                            .map(|argument| self.eval(argument))
                            .collect::<Result<Vec<_>, _>>()?;
                        method(receiver, name, &values)
                    }
                }
            }
            Expr::Index { target, index } => index_into(self.eval(target)?, &self.eval(index)?),
            Expr::JsonPath { source, path } => self.json_path(source, path),
            Expr::Unary { operator, operand } => unary(*operator, &self.eval(operand)?),
            Expr::Binary {
                operator,
                left,
                right,
            } => self.binary(*operator, left, right),
        }
    }

    fn binary(&self, operator: BinaryOperator, left: &'a Expr, right: &'a Expr) -> Evaluated<'a> {
        let lhs = self.eval(left)?;
        match operator {
            BinaryOperator::And => {
                if !lhs.to_bool()? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval(right)?.to_bool()?))
            }
            BinaryOperator::Or => {
                if lhs.to_bool()? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval(right)?.to_bool()?))
            }
            BinaryOperator::Equal => Ok(Value::Bool(lhs.loosely_equals(&self.eval(right)?))),
            BinaryOperator::NotEqual => Ok(Value::Bool(!lhs.loosely_equals(&self.eval(right)?))),
            BinaryOperator::Less
            | BinaryOperator::LessOrEqual
            | BinaryOperator::Greater
            | BinaryOperator::GreaterOrEqual => compare(operator, &lhs, &self.eval(right)?),
            BinaryOperator::Add => add(&lhs, &self.eval(right)?),
            BinaryOperator::Subtract
            | BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Remainder => arithmetic(operator, &lhs, &self.eval(right)?),
        }
    }

    fn json_path(&self, source: &'a Expr, path: &'a PathArgument) -> Evaluated<'a> {
        let dynamic;
        let selector = match path {
            PathArgument::Compiled(precompiled) => precompiled,
            PathArgument::Dynamic(expr) => {
                let text = match self.eval(expr)? {
                    Value::Text(raw) => raw,
                    other => {
                        return Err(EvaluationError::type_mismatch(
                            "jsonPath",
                            format!("a {} path", other.type_name()),
                        ));
                    }
                };
                dynamic = JsonPath::parse(&text).map_err(|error| {
                    EvaluationError::InvalidJsonPath {
                        path: text.clone().into_owned(),
                        reason: error.to_string(),
                    }
                })?;
                &dynamic
            }
        };

        let document = match self.eval(source)? {
            Value::Text(text) => Cow::Owned(parse_json(serde_json::from_str(&text))?),
            Value::Bytes(bytes) => Cow::Owned(parse_json(serde_json::from_slice(&bytes))?),
            Value::Json(json) => json,
            other => {
                return Err(EvaluationError::type_mismatch(
                    "jsonPath",
                    format!("a {} source", other.type_name()),
                ));
            }
        };

        Ok(Value::from_json(selector.select(&document)?))
    }
}

fn parse_json(parsed: serde_json::Result<Json>) -> Result<Json, EvaluationError> {
    parsed.map_err(|error| EvaluationError::InvalidJson(error.to_string()))
}

fn literal_value(literal: &Literal) -> Value<'_> {
    match literal {
        Literal::Null => Value::Null,
        Literal::Bool(value) => Value::Bool(*value),
        Literal::Integer(value) => Value::Integer(*value),
        Literal::Float(value) => Value::Float(*value),
        Literal::Str(value) => Value::Text(Cow::Borrowed(value)),
    }
}

/// Members that count a collection and so apply to headers and objects.
const COLLECTION_MEMBERS: [&str; 3] = ["length", "size", "isEmpty"];

/// Property syntax: `target.name`.
///
/// Collection members win on headers and JSON objects; any other name is
/// resolved as a key there. Everything else treats the name as a
/// zero-argument member.
fn property<'a>(target: Value<'a>, name: &str) -> Evaluated<'a> {
    if COLLECTION_MEMBERS.contains(&name) {
        return method(target, name, &[]);
    }
    match target {
        Value::Headers(headers) => headers
            .get(name)
            .map(Value::from_header)
            .ok_or_else(|| EvaluationError::MissingHeader(name.to_owned())),
        Value::Json(Cow::Borrowed(json)) if json.is_object() => json
            .get(name)
            .map(Value::from_json_ref)
            .ok_or_else(|| EvaluationError::no_such_property(name, "JSON object")),
        Value::Json(Cow::Owned(json)) if json.is_object() => match json {
            Json::Object(mut object) => object
                .remove(name)
                .map(Value::from_json)
                .ok_or_else(|| EvaluationError::no_such_property(name, "JSON object")),
            _ => Err(EvaluationError::no_such_property(name, "JSON array")),
        },
        other => method(other, name, &[]),
    }
}

/// Method syntax: `target.name(arguments)`.
fn method<'a>(target: Value<'a>, name: &str, arguments: &[Value<'a>]) -> Evaluated<'a> {
    match name {
        "length" | "size" => {
            expect_arguments(name, arguments, 0)?;
            length(&target, name).and_then(|count| {
                i64::try_from(count)
                    .map(Value::Integer)
                    .map_err(|_| EvaluationError::ArithmeticOverflow("length"))
            })
        }
        "isEmpty" => {
            expect_arguments(name, arguments, 0)?;
            Ok(Value::Bool(length(&target, name)? == 0))
        }
        "toUpperCase" | "toLowerCase" | "trim" => {
            expect_arguments(name, arguments, 0)?;
            match target {
                Value::Text(text) => Ok(Value::Text(Cow::Owned(match name {
                    "toUpperCase" => text.to_uppercase(),
                    "toLowerCase" => text.to_lowercase(),
                    _ => text.trim().to_owned(),
                }))),
                other => Err(not_applicable(name, &other)),
            }
        }
        "contains" | "startsWith" | "endsWith" => {
            expect_arguments(name, arguments, 1)?;
            match (&target, arguments.first()) {
                (Value::Text(text), Some(Value::Text(needle))) => Ok(Value::Bool(match name {
                    "contains" => text.contains(&**needle),
                    "startsWith" => text.starts_with(&**needle),
                    _ => text.ends_with(&**needle),
                })),
                (_, argument) => Err(EvaluationError::type_mismatch(
                    name,
                    format!(
                        "{} with a {} argument",
                        target.type_name(),
                        argument.map_or("missing", Value::type_name)
                    ),
                )),
            }
        }
        "containsKey" => {
            expect_arguments(name, arguments, 1)?;
            match (&target, arguments.first()) {
                (Value::Headers(headers), Some(Value::Text(key))) => {
                    Ok(Value::Bool(headers.contains_key(key)))
                }
                (Value::Json(json), Some(Value::Text(key))) if json.is_object() => {
                    Ok(Value::Bool(json.get(&**key).is_some()))
                }
                _ => Err(not_applicable(name, &target)),
            }
        }
        _ => Err(EvaluationError::no_such_property(name, target.type_name())),
    }
}

fn expect_arguments(
    member: &str,
    arguments: &[Value<'_>],
    expected: usize,
) -> Result<(), EvaluationError> {
    if arguments.len() == expected {
        Ok(())
    } else {
        Err(EvaluationError::InvalidArguments {
            member: member.to_owned(),
            expected,
            actual: arguments.len(),
        })
    }
}

fn length(target: &Value<'_>, member: &str) -> Result<usize, EvaluationError> {
    match target {
        Value::Text(text) => Ok(text.chars().count()),
        Value::Bytes(bytes) => Ok(bytes.len()),
        Value::Json(json) => match &**json {
            Json::Array(items) => Ok(items.len()),
            Json::Object(object) => Ok(object.len()),
            _ => Err(not_applicable(member, target)),
        },
        Value::Headers(headers) => Ok(headers.len()),
        _ => Err(not_applicable(member, target)),
    }
}

fn not_applicable(operation: &str, target: &Value<'_>) -> EvaluationError {
    EvaluationError::type_mismatch(operation, target.type_name())
}

fn index_into<'a>(target: Value<'a>, index: &Value<'_>) -> Evaluated<'a> {
    match (target, index) {
        (Value::Headers(headers), Value::Text(key)) => headers
            .get(key)
            .map(Value::from_header)
            .ok_or_else(|| EvaluationError::MissingHeader(key.clone().into_owned())),
        (Value::Text(text), Value::Integer(position)) => {
            let length = text.chars().count();
            position_in(*position, length)
                .and_then(|at| text.chars().nth(at))
                .map(|character| Value::Text(Cow::Owned(character.to_string())))
                .ok_or(EvaluationError::IndexOutOfBounds {
                    index: *position,
                    length,
                })
        }
        (Value::Bytes(bytes), Value::Integer(position)) => position_in(*position, bytes.len())
            .and_then(|at| bytes.get(at))
            .map(|byte| Value::Integer(i64::from(*byte)))
            .ok_or(EvaluationError::IndexOutOfBounds {
                index: *position,
                length: bytes.len(),
            }),
        (Value::Json(json), Value::Integer(position)) if json.is_array() => {
            let length = json.as_array().map_or(0, Vec::len);
            position_in(*position, length)
                .and_then(|at| json.get(at))
                .cloned()
                .map(Value::from_json)
                .ok_or(EvaluationError::IndexOutOfBounds {
                    index: *position,
                    length,
                })
        }
        (Value::Json(json), Value::Text(key)) if json.is_object() => json
            .get(&**key)
            .cloned()
            .map(Value::from_json)
            .ok_or_else(|| EvaluationError::no_such_property(&**key, "JSON object")),
        (unindexable, selector) => Err(EvaluationError::type_mismatch(
            "[]",
            format!(
                "{} indexed by {}",
                unindexable.type_name(),
                selector.type_name()
            ),
        )),
    }
}

fn position_in(index: i64, length: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|at| *at < length)
}

#[expect(
    clippy::float_arithmetic,
    reason = "the dialect supports floating-point operands"
)]
fn unary<'a>(operator: UnaryOperator, operand: &Value<'_>) -> Evaluated<'a> {
    match (operator, operand) {
        (UnaryOperator::Not, _) => Ok(Value::Bool(!operand.to_bool()?)),
        (UnaryOperator::Negate, &Value::Integer(value)) => value
            .checked_neg()
            .map(Value::Integer)
            .ok_or(EvaluationError::ArithmeticOverflow("-")),
        (UnaryOperator::Negate, &Value::Float(value)) => Ok(Value::Float(-value)),
        (UnaryOperator::Negate, _) => Err(not_applicable("-", operand)),
    }
}

fn compare<'a>(operator: BinaryOperator, left: &Value<'_>, right: &Value<'_>) -> Evaluated<'a> {
    let comparable = matches!(
        (left, right),
        (Value::Text(_), Value::Text(_))
            | (
                Value::Integer(_) | Value::Float(_),
                Value::Integer(_) | Value::Float(_)
            )
    );
    if !comparable {
        return Err(operand_mismatch(operator, left, right));
    }

    // NaN compares as unordered, which makes every ordering test false.
    let ordering = left.compare(right);
    Ok(Value::Bool(match operator {
        BinaryOperator::Less => ordering == Some(Ordering::Less),
        BinaryOperator::LessOrEqual => {
            matches!(ordering, Some(Ordering::Less | Ordering::Equal))
        }
        BinaryOperator::Greater => ordering == Some(Ordering::Greater),
        _ => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
    }))
}

fn add<'a>(left: &Value<'_>, right: &Value<'_>) -> Evaluated<'a> {
    if matches!(left, Value::Text(_)) || matches!(right, Value::Text(_)) {
        let (Some(prefix), Some(suffix)) = (left.to_text(), right.to_text()) else {
            return Err(operand_mismatch(BinaryOperator::Add, left, right));
        };
        return Ok(Value::Text(Cow::Owned(format!("{prefix}{suffix}"))));
    }
    arithmetic(BinaryOperator::Add, left, right)
}

#[expect(
    clippy::float_arithmetic,
    reason = "the dialect supports floating-point operands"
)]
fn arithmetic<'a>(operator: BinaryOperator, left: &Value<'_>, right: &Value<'_>) -> Evaluated<'a> {
    let symbol = operator.symbol();
    if let (&Value::Integer(lhs), &Value::Integer(rhs)) = (left, right) {
        if matches!(operator, BinaryOperator::Divide | BinaryOperator::Remainder) && rhs == 0 {
            return Err(EvaluationError::DivisionByZero);
        }
        let result = match operator {
            BinaryOperator::Add => lhs.checked_add(rhs),
            BinaryOperator::Subtract => lhs.checked_sub(rhs),
            BinaryOperator::Multiply => lhs.checked_mul(rhs),
            BinaryOperator::Divide => lhs.checked_div(rhs),
            _ => lhs.checked_rem(rhs),
        };
        return result
            .map(Value::Integer)
            .ok_or(EvaluationError::ArithmeticOverflow(symbol));
    }

    let (Some(left_number), Some(right_number)) = (left.as_float(), right.as_float()) else {
        return Err(operand_mismatch(operator, left, right));
    };
    if matches!(operator, BinaryOperator::Divide | BinaryOperator::Remainder)
        && right_number == 0.0
    {
        return Err(EvaluationError::DivisionByZero);
    }
    Ok(Value::Float(match operator {
        BinaryOperator::Add => left_number + right_number,
        BinaryOperator::Subtract => left_number - right_number,
        BinaryOperator::Multiply => left_number * right_number,
        BinaryOperator::Divide => left_number / right_number,
        _ => left_number % right_number,
    }))
}

fn operand_mismatch(
    operator: BinaryOperator,
    left: &Value<'_>,
    right: &Value<'_>,
) -> EvaluationError {
    EvaluationError::type_mismatch(
        operator.symbol(),
        format!("{} and {}", left.type_name(), right.type_name()),
    )
}
