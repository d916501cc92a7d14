//! Abstract Syntax Tree for stache templates.
//!
//! Two closed node families: [`Statement`]s produce output, [`Expression`]s
//! produce values. Nodes are built once by the parser and never mutated, so
//! a tree can be rendered any number of times.

use indexmap::IndexMap;
use stache_lexer::Token;

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// A node that appends to the render output.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Children executed in order into one output buffer.
    Ordered(Vec<Statement>),

    /// Literal text copied verbatim.
    Text(String),

    /// `{{ expr }}`: evaluate and append the value's text.
    Expression(Expression),
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// A parsed literal payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
}

/// Named call arguments in source order. Keys are unique.
pub type NamedArguments = IndexMap<String, Expression>;

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Variable reference: `name`
    Identifier(Token),

    /// `42`, `-1.5`, `'text'`, `true`, `null`
    Literal { token: Token, value: Literal },

    /// `object.property`
    Property {
        object: Box<Expression>,
        property: Token,
    },

    /// `object[index]`
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
    },

    /// `callee(positional, name: named)`
    Call {
        callee: Box<Expression>,
        positional: Vec<Expression>,
        named: NamedArguments,
    },
}
