use crate::token::{ScannedToken, SourceLocation, Token, TokenKind};

/// Scanner mode determines how the next character is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerMode {
    /// Outside tags: accumulate literal text until `{{`.
    Text,
    /// Between `{{` and `}}`: tokenize expression syntax.
    Tag,
}

/// Template source scanner.
///
/// Splits source into literal text and the tokens inside `{{ ... }}` tags.
/// Comment bodies (`{{# ... #}}`) are skipped verbatim, so braces inside a
/// comment never open a tag.
///
/// The scanner never fails. Unterminated strings, comments and tags are
/// truncated at end of input, and characters it does not recognize inside a
/// tag are skipped; the parser reports whatever structural problem remains.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<ScannedToken>,
    mode: ScannerMode,
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            mode: ScannerMode::Text,
        }
    }

    /// Scan the entire source. The last token is always [`TokenKind::Eof`].
    pub fn scan(source: &str) -> Vec<ScannedToken> {
        let mut scanner = Scanner::new(source);
        scanner.scan_tokens();
        tracing::trace!(tokens = scanner.tokens.len(), "scanned template source");
        scanner.tokens
    }

    fn scan_tokens(&mut self) {
        while !self.is_at_end() {
            match self.mode {
                ScannerMode::Text => self.scan_text(),
                ScannerMode::Tag => self.scan_tag_token(),
            }
        }

        let eof = self.mark();
        self.push(TokenKind::Eof, String::new(), eof);
    }

    // --- Outside tags ---

    /// Accumulate literal text up to the next `{{`, then scan the opener.
    fn scan_text(&mut self) {
        let start = self.mark();
        let mut text = String::new();

        while !self.is_at_end() && !self.at("{{") {
            text.push(self.advance());
        }

        if !text.is_empty() {
            self.push(TokenKind::Text, text, start);
        }

        if self.at("{{") {
            self.scan_opener();
        }
    }

    /// Scan `{{`, `{{-`, `{{#` or `{{#-`.
    fn scan_opener(&mut self) {
        let start = self.mark();
        self.advance_by(2);

        let kind = if self.peek() == '#' {
            self.advance();
            TokenKind::OpenComment
        } else {
            TokenKind::OpenTag
        };

        let trim_before = self.peek() == '-';
        if trim_before {
            self.advance();
        }

        let text = self.text_from(start);
        self.push_trimmed(kind, text, start, trim_before, false);

        if trim_before {
            self.skip_whitespace();
        }

        match kind {
            TokenKind::OpenComment => self.scan_comment_body(),
            _ => self.mode = ScannerMode::Tag,
        }
    }

    /// Skip a comment body and scan its closer, if there is one.
    fn scan_comment_body(&mut self) {
        while !self.is_at_end() {
            if self.at("-#}}") {
                self.scan_closer(TokenKind::CloseComment, 4, true);
                return;
            }
            if self.at("#}}") {
                self.scan_closer(TokenKind::CloseComment, 3, false);
                return;
            }
            self.advance();
        }
    }

    // --- Inside tags ---

    fn scan_tag_token(&mut self) {
        let ch = self.peek();

        match ch {
            ' ' | '\t' | '\r' | '\n' => {
                self.advance();
            }

            // Closers win over a trailing minus
            '-' if self.at("-}}") => self.scan_closer(TokenKind::CloseTag, 3, true),
            '}' if self.at("}}") => self.scan_closer(TokenKind::CloseTag, 2, false),

            // Negative numbers only when the digit follows immediately
            '-' if self.peek_at(1).is_ascii_digit() => self.scan_number(),
            '0'..='9' => self.scan_number(),

            '"' | '\'' => self.scan_string(),

            c if c.is_ascii_alphabetic() || c == '_' => self.scan_word(),

            '(' => self.scan_single(TokenKind::LParen),
            ')' => self.scan_single(TokenKind::RParen),
            '[' => self.scan_single(TokenKind::LBracket),
            ']' => self.scan_single(TokenKind::RBracket),
            ',' => self.scan_single(TokenKind::Comma),
            ':' => self.scan_single(TokenKind::Colon),
            '.' => self.scan_single(TokenKind::Dot),
            '/' => self.scan_single(TokenKind::Slash),
            '-' => self.scan_single(TokenKind::Minus),

            c => {
                tracing::trace!(
                    character = %c,
                    line = self.line,
                    column = self.column,
                    "skipping unrecognized character in tag"
                );
                self.advance();
            }
        }
    }

    /// Scan a tag or comment closer of `len` characters and return to text mode.
    fn scan_closer(&mut self, kind: TokenKind, len: usize, trim_after: bool) {
        let start = self.mark();
        self.advance_by(len);
        let text = self.text_from(start);
        self.push_trimmed(kind, text, start, false, trim_after);
        self.mode = ScannerMode::Text;
    }

    fn scan_single(&mut self, kind: TokenKind) {
        let start = self.mark();
        let c = self.advance();
        self.push(kind, c.to_string(), start);
    }

    /// Scan `-?[0-9]+(\.[0-9]+)?`. A `.` not followed by a digit ends the
    /// number, so `5.abs()` is a number followed by a property access.
    fn scan_number(&mut self) {
        let start = self.mark();
        let mut text = String::new();

        if self.peek() == '-' {
            text.push(self.advance());
        }
        while self.peek().is_ascii_digit() {
            text.push(self.advance());
        }
        if self.peek() == '.' && self.peek_at(1).is_ascii_digit() {
            text.push(self.advance());
            while self.peek().is_ascii_digit() {
                text.push(self.advance());
            }
        }

        self.push(TokenKind::NumberLiteral, text, start);
    }

    /// Scan a quoted string. The token value is the unescaped contents; an
    /// unterminated string runs to end of input.
    fn scan_string(&mut self) {
        let start = self.mark();
        let quote = self.advance();
        let mut value = String::new();

        while !self.is_at_end() {
            let c = self.advance();
            if c == quote {
                break;
            }
            if c != '\\' {
                value.push(c);
                continue;
            }
            if self.is_at_end() {
                break;
            }
            match self.advance() {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                other => value.push(other),
            }
        }

        self.push(TokenKind::StringLiteral, value, start);
    }

    /// Scan `[A-Za-z_][A-Za-z0-9_]*` and classify it.
    fn scan_word(&mut self) {
        let start = self.mark();
        let mut word = String::new();

        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            word.push(self.advance());
        }

        let kind = TokenKind::for_word(&word);
        self.push(kind, word, start);
    }

    // --- Helpers ---

    /// Location of the current position, with zero length.
    fn mark(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.pos, 0)
    }

    fn text_from(&self, start: SourceLocation) -> String {
        self.chars[start.offset..self.pos].iter().collect()
    }

    fn push(&mut self, kind: TokenKind, value: String, start: SourceLocation) {
        self.push_trimmed(kind, value, start, false, false);
    }

    fn push_trimmed(
        &mut self,
        kind: TokenKind,
        value: String,
        start: SourceLocation,
        trim_before: bool,
        trim_after: bool,
    ) {
        let location = SourceLocation {
            length: self.pos - start.offset,
            ..start
        };
        self.tokens.push(ScannedToken {
            token: Token::new(kind, value, location),
            trim_before,
            trim_after,
        });
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\r' | '\n') {
            self.advance();
        }
    }

    /// Whether the source continues with `expected` at the current position.
    fn at(&self, expected: &str) -> bool {
        expected
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == c)
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.chars.get(self.pos + offset).copied().unwrap_or('\0')
    }

    /// Consume one character, keeping line and column current.
    fn advance(&mut self) -> char {
        let c = self.peek();
        if self.is_at_end() {
            return c;
        }
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}
