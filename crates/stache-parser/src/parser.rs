//! Template parser for stache.
//!
//! Recursive descent over the token stream produced by
//! [`stache_lexer::tokenize`]:
//!
//! ```text
//! template  := (text | tag | comment)*
//! tag       := '{{' expression? '}}'
//! comment   := '{{#' '#}}'
//! expression:= postfix
//! postfix   := primary ( '.' identifier | '[' expression ']' | '(' args? ')' )*
//! primary   := identifier | literal | '(' expression ')'
//! args      := arg (',' arg)*
//! arg       := identifier ':' expression | expression
//! ```

use crate::ast::{Expression, Literal, NamedArguments, Statement};
use crate::ParseError;
use stache_lexer::{Token, TokenKind};

/// stache template parser.
///
/// Converts a flat token stream into a [`Statement`] tree.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser for the given tokens.
    ///
    /// A trailing [`TokenKind::Eof`] is appended when missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let location = tokens
                .last()
                .map(|t| stache_lexer::SourceLocation {
                    offset: t.location.offset + t.location.length,
                    length: 0,
                    ..t.location
                })
                .unwrap_or_else(|| stache_lexer::SourceLocation::new(1, 1, 0, 0));
            tokens.push(Token::new(TokenKind::Eof, "", location));
        }
        Self { tokens, pos: 0 }
    }

    /// Tokenize and parse template source.
    pub fn parse(source: &str) -> Result<Statement, ParseError> {
        let tokens = stache_lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        let template = parser.parse_template()?;
        let statements = match &template {
            Statement::Ordered(children) => children.len(),
            _ => 1,
        };
        tracing::debug!(tokens = parser.tokens.len(), statements, "parsed template");
        Ok(template)
    }

    /// Parse a whole template.
    ///
    /// A single statement is returned as-is; anything else is wrapped in
    /// [`Statement::Ordered`].
    pub fn parse_template(&mut self) -> Result<Statement, ParseError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::Text => {
                    let text = self.advance().value.clone();
                    statements.push(Statement::Text(text));
                }
                TokenKind::OpenTag => {
                    if let Some(statement) = self.parse_tag()? {
                        statements.push(statement);
                    }
                }
                TokenKind::OpenComment => self.parse_comment()?,
                _ => {
                    return Err(self.error(format!(
                        "Unexpected {} outside of a tag",
                        describe(self.peek())
                    )))
                }
            }
        }

        if statements.len() == 1 {
            return Ok(statements.remove(0));
        }
        Ok(Statement::Ordered(statements))
    }

    // =========================================================================
    // Tags and comments
    // =========================================================================

    /// Parse `{{ expr }}`. An empty tag produces no statement.
    fn parse_tag(&mut self) -> Result<Option<Statement>, ParseError> {
        self.advance(); // consume `{{`

        if self.check(TokenKind::CloseTag) {
            self.advance();
            return Ok(None);
        }

        let expression = self.parse_expression()?;
        self.expect(TokenKind::CloseTag, "Expected '}}' to close tag")?;
        Ok(Some(Statement::Expression(expression)))
    }

    /// Parse `{{# #}}`. The scanner already dropped the comment body.
    fn parse_comment(&mut self) -> Result<(), ParseError> {
        self.advance(); // consume `{{#`
        self.expect(TokenKind::CloseComment, "Expected '#}}' to close comment")?;
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Parse an expression.
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_postfix()
    }

    /// Parse `primary` followed by any chain of `.name`, `[index]` and `(args)`.
    fn parse_postfix(&mut self) -> Result<Expression, ParseError> {
        let mut expression = self.parse_primary()?;

        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_identifier("Expected property name after '.'")?;
                    expression = Expression::Property {
                        object: Box::new(expression),
                        property,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    if self.check(TokenKind::RBracket) {
                        return Err(self.error("Expected index expression inside '[]'".into()));
                    }
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "Expected ']' after index")?;
                    expression = Expression::Index {
                        object: Box::new(expression),
                        index: Box::new(index),
                    };
                }
                TokenKind::LParen => {
                    self.advance();
                    let (positional, named) = self.parse_arguments()?;
                    expression = Expression::Call {
                        callee: Box::new(expression),
                        positional,
                        named,
                    };
                }
                _ => break,
            }
        }

        Ok(expression)
    }

    /// Parse an identifier, a literal, or a parenthesized expression.
    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.peek().clone();

        let value = match token.kind {
            TokenKind::Identifier => {
                self.advance();
                return Ok(Expression::Identifier(token));
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen, "Expected ')' after expression")?;
                return Ok(inner);
            }
            TokenKind::StringLiteral => Literal::String(token.value.clone()),
            TokenKind::NumberLiteral => self.parse_number(&token)?,
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Null => Literal::Null,
            TokenKind::Reserved => {
                return Err(self.error(format!(
                    "'{}' is a reserved keyword and cannot be used as an identifier",
                    token.value
                )))
            }
            _ => {
                return Err(self.error(format!(
                    "Expected expression, found {}",
                    describe(&token)
                )))
            }
        };

        self.advance();
        Ok(Expression::Literal { token, value })
    }

    fn parse_number(&self, token: &Token) -> Result<Literal, ParseError> {
        let text = token.value.as_str();
        let literal = if text.contains('.') {
            text.parse::<f64>().ok().map(Literal::Double)
        } else {
            text.parse::<i64>().ok().map(Literal::Int)
        };
        literal.ok_or_else(|| {
            ParseError::new(format!("Invalid number literal: '{text}'"), Some(token.clone()))
        })
    }

    /// Parse a call's argument list after `(`, through the closing `)`.
    ///
    /// Positional and named arguments may be interleaved; positional order is
    /// kept, and a repeated name is an error.
    fn parse_arguments(&mut self) -> Result<(Vec<Expression>, NamedArguments), ParseError> {
        let mut positional = Vec::new();
        let mut named = NamedArguments::new();

        if self.check(TokenKind::RParen) {
            self.advance();
            return Ok((positional, named));
        }

        loop {
            if self.check(TokenKind::Identifier) && self.peek_next_is(TokenKind::Colon) {
                let name = self.advance().clone();
                self.advance(); // consume `:`
                let value = self.parse_expression()?;
                if named.contains_key(&name.value) {
                    return Err(ParseError::new(
                        format!("Duplicate named parameter: {}", name.value),
                        Some(name),
                    ));
                }
                named.insert(name.value, value);
            } else {
                positional.push(self.parse_expression()?);
            }

            if self.check(TokenKind::Comma) {
                self.advance();
                continue;
            }
            self.expect(TokenKind::RParen, "Expected ',' or ')' in argument list")?;
            return Ok((positional, named));
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_next_is(&self, kind: TokenKind) -> bool {
        self.tokens.get(self.pos + 1).is_some_and(|t| t.kind == kind)
    }

    fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error(message.to_string()))
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<Token, ParseError> {
        match self.peek().kind {
            TokenKind::Identifier => Ok(self.advance().clone()),
            TokenKind::Reserved => Err(self.error(format!(
                "'{}' is a reserved keyword and cannot be used as an identifier",
                self.peek().value
            ))),
            _ => Err(self.error(message.to_string())),
        }
    }

    /// Error at the current token, or at end of input.
    fn error(&self, message: String) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ParseError::new(message, None)
        } else {
            ParseError::new(message, Some(token.clone()))
        }
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Text => "text".to_string(),
        TokenKind::StringLiteral => format!("string '{}'", token.value),
        _ => format!("'{}'", token.value),
    }
}
