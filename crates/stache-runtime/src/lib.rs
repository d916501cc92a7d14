//! stache runtime
//!
//! Renders compiled templates. The value model is a closed set of immutable
//! [`Value`] variants; an [`Evaluator`] walks the syntax tree against a chain
//! of scopes, and [`Engine`] and [`Template`] wrap the whole pipeline:
//!
//! ```text
//! source → Template::compile() → Template
//! Template + globals + context → Engine::render() → String
//! ```
//!
//! Rendering is `async` because user [`Function`]s may suspend. Built-in
//! methods never do.

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod identifier;
pub mod value;

pub use engine::{Engine, Template};
pub use error::{EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use identifier::{Identifier, InvalidIdentifier};
pub use stache_parser::ParseError;
pub use value::{
    for_key, Arguments, Function, Indexable, List, Map, Object, Scalar, Set, Value, NULL,
};

/// Any failure from compiling or rendering.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
