//! Chumsky-based parser producing the expression syntax tree.
//!
//! Parsing runs in three steps:
//! 1. the lexer converts the source into tokens with spans;
//! 2. the grammar below turns the tokens into a [`Node`] tree, binding
//!    operators by precedence;
//! 3. [`resolve`] binds names and functions and compiles literal JSONPath
//!    arguments, producing the [`Expr`] the interpreter runs.
//!
//! Bracket depth is checked on the tokens before the grammar runs, and the
//! depth of the tree is checked while it is resolved.

use chumsky::input::ValueInput;
use chumsky::prelude::*;

use super::{
    ast::{BinaryOperator, Expr, Literal, PathArgument, Root, UnaryOperator},
    json_path::JsonPath,
    lexer::{self, Spanned, Token},
};
use crate::filter::error::ConfigurationError;

/// Maximum nesting depth of a compiled expression.
pub const MAX_NESTING: usize = 128;

const JSON_PATH_FUNCTION: &str = "jsonPath";

type ParserExtra<'tokens, 'src> = extra::Err<Rich<'tokens, Token<'src>>>;

/// Parses `source` into a syntax tree.
pub(super) fn parse(source: &str) -> Result<Expr, ConfigurationError> {
    let tokens = lexer::tokenize(source)?;
    check_bracket_depth(&tokens)?;

    let eoi = SimpleSpan::from(source.len()..source.len());
    let node = expression()
        .parse(tokens.as_slice().map(eoi, |(token, span)| (token, span)))
        .into_result()
        .map_err(lexer::first_error)?;
    resolve(node, 0)
}

/// Unresolved syntax: names and calls are still plain identifiers.
#[derive(Debug)]
enum Node<'src> {
    Literal(Literal),
    Name(&'src str),
    Call {
        name: &'src str,
        arguments: Vec<Node<'src>>,
    },
    Member {
        target: Box<Node<'src>>,
        name: &'src str,
        arguments: Option<Vec<Node<'src>>>,
    },
    Index {
        target: Box<Node<'src>>,
        index: Box<Node<'src>>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Node<'src>>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Node<'src>>,
        right: Box<Node<'src>>,
    },
}

/// A postfix operation applied to an operand.
enum Suffix<'src> {
    Member(&'src str, Option<Vec<Node<'src>>>),
    Index(Node<'src>),
}

/// Parser for a full expression, lowest precedence first.
fn expression<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, Node<'src>, ParserExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
{
    recursive(|expr| {
        let ident = select! { Token::Ident(name) => name }.labelled("identifier");

        let arguments = expr
            .clone()
            .separated_by(just(Token::Comma))
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .labelled("argument list");

        let digits = select! { Token::Integer(digits) => digits };
        let negative_integer = just(Token::Minus)
            .ignore_then(digits.clone())
            .try_map(|magnitude: &str, span| {
                format!("-{magnitude}")
                    .parse::<i64>()
                    .map(Literal::Integer)
                    .map_err(|error| Rich::custom(span, error))
            });
        let integer = digits.clone().try_map(|text: &str, span| {
            text.parse::<i64>()
                .map(Literal::Integer)
                .map_err(|error| Rich::custom(span, error))
        });
        let float = select! { Token::Float(text) => text }.try_map(|text: &str, span| {
            text.parse::<f64>()
                .map(Literal::Float)
                .map_err(|error| Rich::custom(span, error))
        });
        let string = select! { Token::Str(text) => Literal::Str(text) };
        let literal = choice((negative_integer, integer, float, string)).map(Node::Literal);

        // `#` is optional before a function name.
        let call = just(Token::Hash)
            .or_not()
            .ignore_then(ident.clone())
            .then(arguments.clone())
            .map(|(name, supplied)| Node::Call {
                name,
                arguments: supplied,
            })
            .labelled("function call");

        let atom = choice((
            literal,
            call,
            ident.clone().map(Node::Name),
            expr.clone()
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        ))
        .labelled("operand");

        let member = just(Token::Dot)
            .ignore_then(ident.labelled("member name"))
            .then(arguments.or_not())
            .map(|(name, supplied)| Suffix::Member(name, supplied));
        let index = expr
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .map(Suffix::Index);
        let postfix = atom
            .foldl(choice((member, index)).repeated(), apply_suffix)
            .boxed();

        // A `-` directly before an integer belongs to the literal.
        let prefix = choice((
            just(Token::Bang).to(UnaryOperator::Not),
            just(Token::Ident("not")).to(UnaryOperator::Not),
            just(Token::Minus)
                .then_ignore(digits.not())
                .to(UnaryOperator::Negate),
        ));
        let unary = prefix.repeated().foldr(postfix, |operator, operand| Node::Unary {
            operator,
            operand: Box::new(operand),
        })
        .boxed();

        let term = unary.clone().foldl(
            choice((
                just(Token::Star).to(BinaryOperator::Multiply),
                just(Token::Slash).to(BinaryOperator::Divide),
                just(Token::Percent).to(BinaryOperator::Remainder),
            ))
            .then(unary)
            .repeated(),
            binary,
        )
        .boxed();

        let additive = term.clone().foldl(
            choice((
                just(Token::Plus).to(BinaryOperator::Add),
                just(Token::Minus).to(BinaryOperator::Subtract),
            ))
            .then(term)
            .repeated(),
            binary,
        )
        .boxed();

        let comparison = additive.clone().foldl(
            choice((
                just(Token::Op("<")).to(BinaryOperator::Less),
                just(Token::Op("<=")).to(BinaryOperator::LessOrEqual),
                just(Token::Op(">")).to(BinaryOperator::Greater),
                just(Token::Op(">=")).to(BinaryOperator::GreaterOrEqual),
            ))
            .then(additive)
            .repeated(),
            binary,
        )
        .boxed();

        let equality = comparison.clone().foldl(
            choice((
                just(Token::Op("==")).to(BinaryOperator::Equal),
                just(Token::Op("!=")).to(BinaryOperator::NotEqual),
            ))
            .labelled("comparison operator")
            .then(comparison)
            .repeated(),
            binary,
        )
        .boxed();

        let and = equality.clone().foldl(
            choice((just(Token::Op("&&")), just(Token::Ident("and"))))
                .to(BinaryOperator::And)
                .then(equality)
                .repeated(),
            binary,
        )
        .boxed();

        and.clone().foldl(
            choice((just(Token::Op("||")), just(Token::Ident("or"))))
                .to(BinaryOperator::Or)
                .then(and)
                .repeated(),
            binary,
        )
    })
}

fn apply_suffix<'src>(target: Node<'src>, suffix: Suffix<'src>) -> Node<'src> {
    match suffix {
        Suffix::Member(name, arguments) => Node::Member {
            target: Box::new(target),
            name,
            arguments,
        },
        Suffix::Index(index) => Node::Index {
            target: Box::new(target),
            index: Box::new(index),
        },
    }
}

fn binary<'src>(left: Node<'src>, (operator, right): (BinaryOperator, Node<'src>)) -> Node<'src> {
    Node::Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Rejects token streams whose brackets nest deeper than [`MAX_NESTING`].
fn check_bracket_depth(tokens: &[Spanned<Token<'_>>]) -> Result<(), ConfigurationError> {
    let mut depth = 0_usize;
    for (token, _) in tokens {
        match token {
            Token::LParen | Token::LBracket => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ConfigurationError::NestingTooDeep { limit: MAX_NESTING });
                }
            }
            Token::RParen | Token::RBracket => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Binds names, checks calls and converts `node` into an [`Expr`].
///
/// `depth` counts the nodes above `node`; deeper trees are rejected.
fn resolve(node: Node<'_>, depth: usize) -> Result<Expr, ConfigurationError> {
    if depth > MAX_NESTING {
        return Err(ConfigurationError::NestingTooDeep { limit: MAX_NESTING });
    }
    let below = depth + 1;
    match node {
        Node::Literal(literal) => Ok(Expr::Literal(literal)),
        Node::Name(name) => named_operand(name),
        Node::Call { name, arguments } => function_call(name, arguments, below),
        Node::Member {
            target,
            name,
            arguments,
        } => Ok(Expr::Member {
            target: Box::new(resolve(*target, below)?),
            name: name.to_owned(),
            arguments: arguments
                .map(|supplied| resolve_all(supplied, below))
                .transpose()?,
        }),
        Node::Index { target, index } => Ok(Expr::Index {
            target: Box::new(resolve(*target, below)?),
            index: Box::new(resolve(*index, below)?),
        }),
        Node::Unary { operator, operand } => Ok(Expr::Unary {
            operator,
            operand: Box::new(resolve(*operand, below)?),
        }),
        Node::Binary {
            operator,
            left,
            right,
        } => Ok(Expr::Binary {
            operator,
            left: Box::new(resolve(*left, below)?),
            right: Box::new(resolve(*right, below)?),
        }),
    }
}

fn resolve_all(nodes: Vec<Node<'_>>, depth: usize) -> Result<Vec<Expr>, ConfigurationError> {
    nodes.into_iter().map(|node| resolve(node, depth)).collect()
}

/// Resolves a bare identifier: a keyword literal or a root binding.
fn named_operand(name: &str) -> Result<Expr, ConfigurationError> {
    match name {
        "true" => Ok(Expr::Literal(Literal::Bool(true))),
        "false" => Ok(Expr::Literal(Literal::Bool(false))),
        "null" => Ok(Expr::Literal(Literal::Null)),
        "payload" => Ok(Expr::Root(Root::Payload)),
        "headers" => Ok(Expr::Root(Root::Headers)),
        _ => Err(ConfigurationError::UnknownIdentifier(name.to_owned())),
    }
}

fn function_call(
    name: &str,
    arguments: Vec<Node<'_>>,
    depth: usize,
) -> Result<Expr, ConfigurationError> {
    if name != JSON_PATH_FUNCTION {
        return Err(ConfigurationError::UnknownFunction(name.to_owned()));
    }

    let actual = arguments.len();
    let mut supplied = resolve_all(arguments, depth)?.into_iter();
    let (Some(source), Some(path_expr), None) =
        (supplied.next(), supplied.next(), supplied.next())
    else {
        return Err(ConfigurationError::Arity {
            function: name.to_owned(),
            expected: 2,
            actual,
        });
    };

    let path = match path_expr {
        Expr::Literal(Literal::Str(literal)) => {
            let compiled = JsonPath::parse(&literal).map_err(|error| {
                ConfigurationError::InvalidJsonPath {
                    path: literal.clone(),
                    reason: error.to_string(),
                }
            })?;
            PathArgument::Compiled(compiled)
        }
        dynamic => PathArgument::Dynamic(Box::new(dynamic)),
    };

    Ok(Expr::JsonPath {
        source: Box::new(source),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokens(source: &str) -> Vec<Token<'_>> {
        lexer::tokenize(source)
            .expect("source should tokenize")
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[rstest]
    fn lexer_keeps_operator_runs_together() {
        assert_eq!(
            tokens("headers.a >= 1 && !payload.isEmpty"),
            vec![
                Token::Ident("headers"),
                Token::Dot,
                Token::Ident("a"),
                Token::Op(">="),
                Token::Integer("1"),
                Token::Op("&&"),
                Token::Bang,
                Token::Ident("payload"),
                Token::Dot,
                Token::Ident("isEmpty"),
            ]
        );
    }

    #[rstest]
    fn lexer_resolves_string_escapes() {
        assert_eq!(
            tokens(r#"'it\'s' "a\tb""#),
            vec![Token::Str("it's".to_owned()), Token::Str("a\tb".to_owned())]
        );
    }

    #[rstest]
    fn lexer_only_continues_numbers_with_digits() {
        assert_eq!(
            tokens("1.5 2.size"),
            vec![
                Token::Float("1.5"),
                Token::Integer("2"),
                Token::Dot,
                Token::Ident("size"),
            ]
        );
    }

    #[rstest]
    fn tokens_preserve_spans() {
        let source = "payload  == 'x'";
        let spanned = lexer::tokenize(source).expect("source should tokenize");
        let ranges: Vec<_> = spanned.iter().map(|(_, span)| span.into_range()).collect();
        assert_eq!(ranges, vec![0..7, 9..11, 12..15]);
    }

    #[rstest]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse("1 + 2 * 3").expect("expression should parse");
        assert_eq!(
            expr,
            Expr::Binary {
                operator: BinaryOperator::Add,
                left: Box::new(Expr::Literal(Literal::Integer(1))),
                right: Box::new(Expr::Binary {
                    operator: BinaryOperator::Multiply,
                    left: Box::new(Expr::Literal(Literal::Integer(2))),
                    right: Box::new(Expr::Literal(Literal::Integer(3))),
                }),
            }
        );
    }

    #[rstest]
    fn minus_before_an_integer_is_part_of_the_literal() {
        assert_eq!(
            parse("-9223372036854775808"),
            Ok(Expr::Literal(Literal::Integer(i64::MIN)))
        );
        assert_eq!(
            parse("--1"),
            Ok(Expr::Unary {
                operator: UnaryOperator::Negate,
                operand: Box::new(Expr::Literal(Literal::Integer(-1))),
            })
        );
    }

    #[rstest]
    fn oversized_integers_are_syntax_errors() {
        assert!(matches!(
            parse("9223372036854775808"),
            Err(ConfigurationError::Syntax { offset: 0, .. })
        ));
    }

    #[rstest]
    fn deep_operator_chains_are_rejected() {
        let source = vec!["1"; MAX_NESTING + 2].join(" + ");
        assert_eq!(
            parse(&source),
            Err(ConfigurationError::NestingTooDeep { limit: MAX_NESTING })
        );
    }
}
