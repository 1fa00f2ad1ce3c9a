//! A compiled JSONPath subset used by the `jsonPath` function.
//!
//! Supported syntax: the `$` root, `.name` and `['name']` member access,
//! `[n]` array indexing (negative indices count from the end), and the
//! `.*` / `[*]` wildcards.

use serde_json::Value;
use thiserror::Error;

use crate::filter::error::EvaluationError;

/// A JSONPath that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at offset {offset}")]
pub(super) struct JsonPathSyntaxError {
    offset: usize,
    reason: String,
}

impl JsonPathSyntaxError {
    fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(i64),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct JsonPath {
    source: String,
    segments: Vec<Segment>,
}

impl JsonPath {
    pub(super) fn parse(path: &str) -> Result<Self, JsonPathSyntaxError> {
        let chars: Vec<char> = path.trim().chars().collect();
        let mut cursor = Cursor {
            chars: &chars,
            position: 0,
        };

        if cursor.bump() != Some('$') {
            return Err(JsonPathSyntaxError::new(0, "path must start with '$'"));
        }

        let mut segments = Vec::new();
        while let Some(character) = cursor.bump() {
            let segment = match character {
                '.' => cursor.dotted_segment()?,
                '[' => cursor.bracketed_segment()?,
                other => {
                    return Err(JsonPathSyntaxError::new(
                        cursor.position.saturating_sub(1),
                        format!("unexpected character '{other}'"),
                    ));
                }
            };
            segments.push(segment);
        }

        Ok(Self {
            source: path.to_owned(),
            segments,
        })
    }

    /// Returns `true` unless the path contains a wildcard.
    fn is_definite(&self) -> bool {
        !self.segments.contains(&Segment::Wildcard)
    }

    /// Selects from `document`.
    ///
    /// A definite path yields the single matched value; a path with a
    /// wildcard yields an array of every match, possibly empty.
    pub(super) fn select(&self, document: &Value) -> Result<Value, EvaluationError> {
        let mut current = vec![document];
        for segment in &self.segments {
            let mut next = Vec::new();
            for node in current {
                match segment {
                    Segment::Field(name) => {
                        next.extend(node.as_object().and_then(|object| object.get(name)));
                    }
                    Segment::Index(index) => {
                        next.extend(node.as_array().and_then(|items| {
                            resolve_index(*index, items.len()).and_then(|at| items.get(at))
                        }));
                    }
                    Segment::Wildcard => match node {
                        Value::Array(items) => next.extend(items),
                        Value::Object(object) => next.extend(object.values()),
                        _ => {}
                    },
                }
            }
            current = next;
        }

        if self.is_definite() {
            current
                .first()
                .map(|value| (*value).clone())
                .ok_or_else(|| EvaluationError::PathNotFound(self.source.clone()))
        } else {
            Ok(Value::Array(current.into_iter().cloned().collect()))
        }
    }
}

fn resolve_index(index: i64, length: usize) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok()
    } else {
        usize::try_from(index.unsigned_abs())
            .ok()
            .and_then(|back| length.checked_sub(back))
    }
}

struct Cursor<'c> {
    chars: &'c [char],
    position: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let character = self.peek()?;
        self.position += 1;
        Some(character)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn dotted_segment(&mut self) -> Result<Segment, JsonPathSyntaxError> {
        match self.peek() {
            Some('.') => Err(JsonPathSyntaxError::new(
                self.position,
                "recursive descent '..' is not supported",
            )),
            Some('*') => {
                self.position += 1;
                Ok(Segment::Wildcard)
            }
            _ => {
                let start = self.position;
                let mut name = String::new();
                while let Some(character) = self.peek() {
                    if matches!(character, '.' | '[') || character.is_whitespace() {
                        break;
                    }
                    name.push(character);
                    self.position += 1;
                }
                if name.is_empty() {
                    return Err(JsonPathSyntaxError::new(start, "expected a member name"));
                }
                Ok(Segment::Field(name))
            }
        }
    }

    fn bracketed_segment(&mut self) -> Result<Segment, JsonPathSyntaxError> {
        self.skip_whitespace();
        let segment = match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.position += 1;
                Segment::Field(self.quoted(quote)?)
            }
            Some('*') => {
                self.position += 1;
                Segment::Wildcard
            }
            Some(_) => Segment::Index(self.index()?),
            None => return Err(JsonPathSyntaxError::new(self.position, "unterminated '['")),
        };
        self.skip_whitespace();
        if self.bump() != Some(']') {
            return Err(JsonPathSyntaxError::new(
                self.position.saturating_sub(1),
                "expected ']'",
            ));
        }
        Ok(segment)
    }

    fn quoted(&mut self, quote: char) -> Result<String, JsonPathSyntaxError> {
        let start = self.position;
        let mut name = String::new();
        loop {
            match self.bump() {
                Some('\\') => {
                    let escaped = self.bump().ok_or_else(|| {
                        JsonPathSyntaxError::new(self.position, "unterminated escape")
                    })?;
                    name.push(escaped);
                }
                Some(character) if character == quote => return Ok(name),
                Some(character) => name.push(character),
                None => return Err(JsonPathSyntaxError::new(start, "unterminated quoted name")),
            }
        }
    }

    fn index(&mut self) -> Result<i64, JsonPathSyntaxError> {
        let start = self.position;
        let mut digits = String::new();
        if self.peek() == Some('-') {
            digits.push('-');
            self.position += 1;
        }
        while let Some(character) = self.peek().filter(char::is_ascii_digit) {
            digits.push(character);
            self.position += 1;
        }
        digits
            .parse()
            .map_err(|_| JsonPathSyntaxError::new(start, "expected an index, '*' or a quoted name"))
    }
}
