//! Chumsky-based tokenizer for filter expressions.
//!
//! The lexer turns the source text into tokens carrying their byte spans;
//! the parser then works on the token stream. Runs of `=`, `<`, `>`, `&`
//! and `|` are lexed as a single operator token so that a stray `=` or `&`
//! is reported by the parser at its own offset.

use std::fmt;

use chumsky::error::RichReason;
use chumsky::prelude::*;

use crate::filter::error::ConfigurationError;

/// A value paired with its span in the source.
pub(super) type Spanned<T> = (T, SimpleSpan);

type LexerExtra<'src> = extra::Err<Rich<'src, char>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token<'src> {
    /// Decimal digits, converted by the parser so a leading `-` can fold in.
    Integer(&'src str),
    Float(&'src str),
    /// String contents with escapes resolved.
    Str(String),
    Ident(&'src str),
    /// A comparison or logical operator such as `==`, `<=` or `&&`.
    Op(&'src str),
    Hash,
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(digits) | Self::Float(digits) => write!(f, "{digits}"),
            Self::Str(text) => write!(f, "'{text}'"),
            Self::Ident(name) | Self::Op(name) => write!(f, "{name}"),
            Self::Hash => f.write_str("#"),
            Self::Dot => f.write_str("."),
            Self::Comma => f.write_str(","),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::LBracket => f.write_str("["),
            Self::RBracket => f.write_str("]"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Percent => f.write_str("%"),
            Self::Bang => f.write_str("!"),
        }
    }
}

/// Splits `source` into spanned tokens.
pub(super) fn tokenize(source: &str) -> Result<Vec<Spanned<Token<'_>>>, ConfigurationError> {
    lexer()
        .parse(source)
        .into_result()
        .map_err(first_error)
}

fn lexer<'src>() -> impl Parser<'src, &'src str, Vec<Spanned<Token<'src>>>, LexerExtra<'src>> {
    // A dot only continues a number when digits follow it.
    let number = text::digits(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(|digits: &'src str| {
            if digits.contains('.') {
                Token::Float(digits)
            } else {
                Token::Integer(digits)
            }
        })
        .labelled("number");

    let op = choice((
        just("!=").to_slice(),
        one_of("=<>&|").repeated().at_least(1).to_slice(),
    ))
    .map(Token::Op)
    .labelled("operator");

    let punctuation = choice((
        just('#').to(Token::Hash),
        just('.').to(Token::Dot),
        just(',').to(Token::Comma),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('[').to(Token::LBracket),
        just(']').to(Token::RBracket),
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('%').to(Token::Percent),
        just('!').to(Token::Bang),
    ));

    let ident = any()
        .filter(|c: &char| c.is_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_alphanumeric() || *c == '_')
                .repeated(),
        )
        .to_slice()
        .map(Token::Ident)
        .labelled("identifier");

    let token = choice((
        number,
        op,
        punctuation,
        quoted('\'').map(Token::Str),
        quoted('"').map(Token::Str),
        ident,
    ));

    token
        .map_with(|tok, e| (tok, e.span()))
        .padded()
        .repeated()
        .collect()
}

/// A string delimited by `quote`, with `\n`, `\t`, `\r`, `\\` and escaped
/// quotes resolved.
fn quoted<'src>(quote: char) -> impl Parser<'src, &'src str, String, LexerExtra<'src>> + Clone {
    let escape = just('\\')
        .ignore_then(choice((
            just('n').to('\n'),
            just('t').to('\t'),
            just('r').to('\r'),
            one_of("\\'\""),
        )))
        .labelled("escape sequence");

    just(quote)
        .ignore_then(
            none_of([quote, '\\'])
                .or(escape)
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just(quote).labelled("closing quote"))
        .labelled("string literal")
}

/// Converts the first chumsky error into a [`ConfigurationError`].
///
/// Running out of input is [`ConfigurationError::UnexpectedEnd`]; any other
/// failure is a [`ConfigurationError::Syntax`] at the start of its span.
pub(super) fn first_error<T: fmt::Display>(errors: Vec<Rich<'_, T>>) -> ConfigurationError {
    errors
        .into_iter()
        .next()
        .map_or_else(
            || ConfigurationError::unexpected_end("an operand"),
            |error| configuration_error(&error),
        )
}

fn configuration_error<T: fmt::Display>(error: &Rich<'_, T>) -> ConfigurationError {
    let is_custom = matches!(error.reason(), RichReason::Custom(_));
    if error.found().is_none() && !is_custom {
        let expected = error
            .expected()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        return ConfigurationError::unexpected_end(if expected.is_empty() {
            "more input".to_owned()
        } else {
            expected
        });
    }
    ConfigurationError::syntax(error.span().start, error.to_string())
}
