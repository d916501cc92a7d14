//! stache lexer
//!
//! Turns template source into tokens. The [`Scanner`] splits literal text from
//! `{{ ... }}` tags and `{{# ... #}}` comments and tokenizes tag contents; the
//! [`whitespace`] pass then applies `-` trim modifiers and yields the plain
//! token stream the parser reads.
//!
//! Lexing never fails: malformed input is truncated or skipped, and the parser
//! reports what is left.
//!
//! # Example
//!
//! ```
//! use stache_lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize("Hello {{- name }}");
//! assert_eq!(tokens[0].value, "Hello");
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
//! ```

pub mod scanner;
pub mod token;
pub mod whitespace;

pub use scanner::Scanner;
pub use token::{ScannedToken, SourceLocation, Token, TokenKind, RESERVED_KEYWORDS};

/// Scan `source` and apply whitespace control.
pub fn tokenize(source: &str) -> Vec<Token> {
    whitespace::process(&Scanner::scan(source))
}
