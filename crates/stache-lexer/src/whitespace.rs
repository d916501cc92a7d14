//! Whitespace control.
//!
//! Applies `{{-` / `-}}` trim modifiers to the text tokens next to them and
//! strips the modifier flags, producing the plain token stream the parser
//! consumes.

use crate::token::{ScannedToken, Token, TokenKind};

fn is_trim_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Apply trim modifiers in a single forward pass.
///
/// An opener with `trim_before` trims the end of the text token emitted just
/// before it; a closer with `trim_after` trims the start of the text token
/// right after it. Text emptied by trimming is dropped.
pub fn process(tokens: &[ScannedToken]) -> Vec<Token> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut trim_next_text = false;

    for scanned in tokens {
        let token = &scanned.token;

        if token.kind == TokenKind::Text {
            let mut text = token.clone();
            if trim_next_text {
                trim_start(&mut text);
            }
            trim_next_text = false;
            if !text.value.is_empty() {
                output.push(text);
            }
            continue;
        }

        if scanned.trim_before && token.kind.is_delimiter() {
            if let Some(previous) = output.last_mut().filter(|t| t.kind == TokenKind::Text) {
                trim_end(previous);
                if previous.value.is_empty() {
                    output.pop();
                }
            }
        }

        trim_next_text = scanned.trim_after && token.kind.is_delimiter();
        output.push(token.clone());
    }

    output
}

fn trim_start(token: &mut Token) {
    let trimmed = token.value.trim_start_matches(is_trim_whitespace);
    let removed = token.value.len() - trimmed.len();
    if removed == 0 {
        return;
    }
    token.location = token.location.after(&token.value[..removed]);
    token.value = trimmed.to_string();
}

fn trim_end(token: &mut Token) {
    let trimmed_len = token.value.trim_end_matches(is_trim_whitespace).len();
    if trimmed_len == token.value.len() {
        return;
    }
    let removed = token.value[trimmed_len..].chars().count();
    token.value.truncate(trimmed_len);
    token.location.length = token.location.length.saturating_sub(removed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use pretty_assertions::assert_eq;

    fn processed(source: &str) -> Vec<(TokenKind, String)> {
        process(&Scanner::scan(source))
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        processed(source)
            .into_iter()
            .filter(|(kind, _)| *kind == TokenKind::Text)
            .map(|(_, value)| value)
            .collect()
    }

    // =========================================================================
    // Trimming
    // =========================================================================

    #[test]
    fn test_no_modifiers_untouched() {
        assert_eq!(texts("a  {{ x }}  b"), vec!["a  ", "  b"]);
    }

    #[test]
    fn test_trim_both_sides() {
        assert_eq!(texts("Before   {{- name -}}   After"), vec!["Before", "After"]);
    }

    #[test]
    fn test_trim_before_only() {
        assert_eq!(texts("a \n\t{{- x }} b"), vec!["a", " b"]);
    }

    #[test]
    fn test_trim_after_only() {
        assert_eq!(texts("a {{ x -}}\r\n b"), vec!["a ", "b"]);
    }

    #[test]
    fn test_trim_removes_empty_text() {
        assert_eq!(
            processed("{{ a -}}   \n  {{- b }}"),
            vec![
                (TokenKind::OpenTag, "{{".into()),
                (TokenKind::Identifier, "a".into()),
                (TokenKind::CloseTag, "-}}".into()),
                (TokenKind::OpenTag, "{{-".into()),
                (TokenKind::Identifier, "b".into()),
                (TokenKind::CloseTag, "}}".into()),
                (TokenKind::Eof, "".into()),
            ]
        );
    }

    #[test]
    fn test_comment_modifiers() {
        assert_eq!(texts("A  {{#- c -#}}  B"), vec!["A", "B"]);
        assert_eq!(texts("A {{# c #}} B"), vec!["A ", " B"]);
    }

    #[test]
    fn test_trim_only_touches_adjacent_text() {
        assert_eq!(texts("a  {{ x }}  b  {{- y }}"), vec!["a  ", "  b"]);
    }

    #[test]
    fn test_unicode_whitespace_is_kept() {
        assert_eq!(texts("a\u{00a0}{{- x -}}\u{2003}b"), vec!["a\u{00a0}", "\u{2003}b"]);
    }

    // =========================================================================
    // Locations
    // =========================================================================

    #[test]
    fn test_leading_trim_moves_location() {
        let tokens = process(&Scanner::scan("{{ x -}}\n  tail"));
        let text = tokens.iter().find(|t| t.kind == TokenKind::Text).unwrap();
        assert_eq!(text.value, "tail");
        assert_eq!(text.location.line, 2);
        assert_eq!(text.location.column, 3);
        assert_eq!(text.location.offset, 11);
        assert_eq!(text.location.length, 4);
    }

    #[test]
    fn test_trailing_trim_shortens_location() {
        let tokens = process(&Scanner::scan("head  {{- x }}"));
        assert_eq!(tokens[0].value, "head");
        assert_eq!(tokens[0].location.length, 4);
    }
}
