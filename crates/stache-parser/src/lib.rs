//! stache parser
//!
//! Parses the whitespace-processed token stream into a [`Statement`] tree.
//! Parsing is eager: the first structural error aborts with a [`ParseError`]
//! and no partial tree is returned.

pub mod ast;
pub mod parser;

pub use ast::{Expression, Literal, NamedArguments, Statement};
pub use parser::Parser;

use stache_lexer::Token;

/// Parser error, carrying the offending token when there is one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error {}: {message}", position(.token))]
pub struct ParseError {
    pub message: String,
    pub token: Option<Token>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, token: Option<Token>) -> Self {
        Self {
            message: message.into(),
            token,
        }
    }
}

fn position(token: &Option<Token>) -> String {
    match token {
        Some(token) => format!(
            "at line {}, column {}",
            token.location.line, token.location.column
        ),
        None => "at end of input".to_string(),
    }
}
