use serde::Serialize;

/// A position in template source, used for diagnostics.
///
/// `line` and `column` are 1-based; `offset` is the 0-based character index
/// of the first character and `length` the number of characters covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub length: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }

    /// Location of the first character that follows `skipped`, when `skipped`
    /// was a prefix of the text this location covered.
    pub fn after(&self, skipped: &str) -> Self {
        let mut line = self.line;
        let mut column = self.column;
        let mut count = 0;
        for c in skipped.chars() {
            count += 1;
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self {
            line,
            column,
            offset: self.offset + count,
            length: self.length.saturating_sub(count),
        }
    }
}

/// Token classification for template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Outside tags
    Text,
    /// Reserved; the scanner keeps newlines inside `Text`.
    Newline,

    // Delimiters
    OpenTag,
    CloseTag,
    OpenComment,
    CloseComment,

    // Literals
    Identifier,
    StringLiteral,
    NumberLiteral,

    // Keywords
    True,
    False,
    Null,
    /// `if else for let set in include render`: no grammar yet, never an identifier.
    Reserved,

    // Punctuation
    LParen,
    RParen,
    Comma,
    Colon,
    Dot,
    Slash,
    Minus,
    LBracket,
    RBracket,

    // End of input
    Eof,
}

/// Words the scanner classifies as [`TokenKind::Reserved`].
pub const RESERVED_KEYWORDS: &[&str] = &[
    "if", "else", "for", "let", "set", "in", "include", "render",
];

impl TokenKind {
    /// Classify an identifier-shaped word.
    pub fn for_word(word: &str) -> TokenKind {
        match word {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            w if RESERVED_KEYWORDS.contains(&w) => TokenKind::Reserved,
            _ => TokenKind::Identifier,
        }
    }

    /// Whether the whitespace processor looks at trim flags on this kind.
    pub fn is_delimiter(self) -> bool {
        matches!(
            self,
            TokenKind::OpenTag
                | TokenKind::CloseTag
                | TokenKind::OpenComment
                | TokenKind::CloseComment
        )
    }
}

/// A token produced by the scanner.
///
/// `value` holds the token's text: raw literal text for [`TokenKind::Text`],
/// the unescaped contents for [`TokenKind::StringLiteral`], and the source
/// spelling for everything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
        }
    }
}

/// A token straight out of the scanner, still carrying whitespace-control flags.
///
/// Only [`crate::whitespace::process`] consumes these; everything downstream
/// sees plain [`Token`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedToken {
    pub token: Token,
    /// `{{-` / `{{#-`: trim whitespace at the end of the preceding text.
    pub trim_before: bool,
    /// `-}}` / `-#}}`: trim whitespace at the start of the following text.
    pub trim_after: bool,
}
