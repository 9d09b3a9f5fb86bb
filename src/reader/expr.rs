//! Parsed slot text and its evaluation against a context

use std::fmt;

use chumsky::error::RichPattern;
use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::{CompileError, RenderError};
use crate::renderer::{Context, Value};
use crate::scanner::Position;

use super::lexer::{describe, lex, Token};

/// One step of a dotted path after its root name
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Field(String),
    Index(usize),
}

/// What a slot refers to
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `name.field.0`
    Path { root: String, keys: Vec<Key> },
    /// A string, integer or boolean literal
    Literal(Value),
    /// `handler(arg, ...)`
    Call { name: String, args: Vec<Expr> },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Path { root, keys } => {
                write!(f, "{}", root)?;
                for key in keys {
                    match key {
                        Key::Field(name) => write!(f, ".{}", name)?,
                        Key::Index(i) => write!(f, ".{}", i)?,
                    }
                }
                Ok(())
            }
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Parse slot text into an expression
pub fn parse(content: &str, start: Position) -> Result<Expr, CompileError> {
    let tokens = lex(content)
        .map_err(|span| CompileError::syntax(format!("unexpected '{}'", &content[span]), start))?;
    if tokens.is_empty() {
        return Err(CompileError::syntax("empty slot", start));
    }

    let len = content.len();
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (tok, SimpleSpan::from(span)));

    // Split (Token, SimpleSpan) into token and span parts
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    slot_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| syntax_error(&errs, start))
}

fn slot_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let expr = recursive(|expr| {
        let ident = select! {
            Token::Ident(s) => s,
        };

        let literal = select! {
            Token::String(s) => Value::String(s),
            Token::Integer(n) => Value::Integer(n),
            Token::Float(n) => Value::Float(n),
            Token::True => Value::Boolean(true),
            Token::False => Value::Boolean(false),
        }
        .map(Expr::Literal);

        let key = select! {
            Token::Ident(s) => Key::Field(s),
            Token::Integer(n) if n >= 0 => Key::Index(n as usize),
        };

        // Call: name "(" [expr { "," expr }] ")"
        let call = ident
            .clone()
            .then(
                expr.separated_by(just(Token::Comma))
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
            )
            .map(|(name, args)| Expr::Call { name, args });

        // Path: name { "." (name | index) }
        let path = ident
            .then(just(Token::Dot).ignore_then(key).repeated().collect::<Vec<_>>())
            .map(|(root, keys)| Expr::Path { root, keys });

        choice((call, path, literal))
    });

    expr.then_ignore(end())
}

/// Describe the first parse failure as a syntax error at the slot
fn syntax_error(errs: &[Rich<'_, Token>], start: Position) -> CompileError {
    let message = match errs.first() {
        Some(err) => describe_error(err),
        None => "invalid slot".to_string(),
    };
    CompileError::syntax(message, start)
}

fn describe_error(err: &Rich<'_, Token>) -> String {
    let found = match err.found() {
        Some(tok) => describe(tok),
        None => "end of slot".to_string(),
    };

    let expected: Vec<String> = err
        .expected()
        .filter_map(|e| match e {
            RichPattern::Token(tok) => Some(describe(tok)),
            RichPattern::Label(label) => Some(label.to_string()),
            RichPattern::EndOfInput => Some("end of slot".to_string()),
            RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
            RichPattern::Any => Some("any token".to_string()),
            RichPattern::SomethingElse => None,
        })
        .collect();

    if expected.is_empty() {
        format!("unexpected {}", found)
    } else {
        format!("unexpected {}, expected {}", found, expected.join(" or "))
    }
}

impl Expr {
    /// Evaluate against the context; `start` positions any error
    pub fn eval(&self, ctx: &Context, start: Position) -> Result<Value, RenderError> {
        match self {
            Expr::Path { root, keys } => {
                let mut current = ctx.lookup(root).ok_or_else(|| RenderError::Undefined {
                    name: root.clone(),
                    start,
                })?;
                let mut path = root.clone();
                for key in keys {
                    let next = match (current, key) {
                        (Value::Table(table), Key::Field(name)) => table.get(name),
                        (Value::Table(table), Key::Index(i)) => table.get(&i.to_string()),
                        (Value::Array(items), Key::Index(i)) => items.get(*i),
                        _ => return Err(RenderError::NotIndexable { path, start }),
                    };
                    match key {
                        Key::Field(name) => path = format!("{}.{}", path, name),
                        Key::Index(i) => path = format!("{}.{}", path, i),
                    }
                    current = next.ok_or_else(|| RenderError::Undefined {
                        name: path.clone(),
                        start,
                    })?;
                }
                Ok(current.clone())
            }
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Call { name, args } => {
                let handler = ctx.handler(name).ok_or_else(|| RenderError::UnknownHandler {
                    name: name.clone(),
                    start,
                })?;
                let values = args
                    .iter()
                    .map(|arg| arg.eval(ctx, start))
                    .collect::<Result<Vec<_>, _>>()?;
                handler(&values).map_err(|message| RenderError::Handler {
                    name: name.clone(),
                    message,
                })
            }
        }
    }
}
