//! Parse error types.

use crate::span::Span;
use thiserror::Error;

/// A lexical or grammatical failure while turning UML source text into
/// the raw syntax tree consumed by the `umlc` core.
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    /// Unexpected token.
    #[error("unexpected {found} at {span:?}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input at {span:?}, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    /// Unterminated string literal (no closing quote before the newline).
    #[error("unterminated string literal starting at {span:?}")]
    UnterminatedString { span: Span },

    /// A numeric literal with a digit sequence too large to parse.
    #[error("invalid number literal '{literal}' at {span:?}")]
    InvalidNumber { literal: String, span: Span },

    /// An unindent that doesn't line up with any enclosing block's column.
    #[error("unindent does not match any outer indentation level at {span:?}")]
    BadDedent { span: Span },

    /// A block header (`def`/`if`/`for`/`else`) with no indented body.
    #[error("expected an indented block at {span:?}")]
    ExpectedIndent { span: Span },

    /// A character outside the lexer's token set.
    #[error("unrecognized character {found:?} at {span:?}")]
    UnrecognizedCharacter { found: String, span: Span },
}

impl ParseError {
    /// Get the span of the error.
    pub fn span(&self) -> &Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::UnterminatedString { span }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::BadDedent { span }
            | ParseError::ExpectedIndent { span }
            | ParseError::UnrecognizedCharacter { span, .. } => span,
        }
    }

    /// Format the error with a one-line source-context snippet, `rustc`-style.
    pub fn format_with_context(&self, source: &str) -> String {
        let span = self.span();
        let lines: Vec<&str> = source.lines().collect();
        let line_idx = span.start_line.saturating_sub(1);

        let Some(line) = lines.get(line_idx) else {
            return String::new();
        };

        let col = span.start_column.saturating_sub(1);
        let spaces = " ".repeat(col);
        format!("  {} | {}\n  {} | {}^", span.start_line, line, " ".repeat(span.start_line.to_string().len()), spaces)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_token_reports_span() {
        let span = Span::new(0, 5, 1, 1, 1, 6);
        let err = ParseError::UnexpectedToken {
            found: "'+'".into(),
            expected: "an expression".into(),
            span,
        };
        assert_eq!(*err.span(), span);
        assert!(err.to_string().contains("expected an expression"));
    }

    #[test]
    fn format_with_context_points_at_column() {
        let source = "x: uint = \n";
        let span = Span::new(10, 10, 1, 1, 11, 11);
        let err = ParseError::UnexpectedEof {
            expected: "an expression".into(),
            span,
        };
        let context = err.format_with_context(source);
        assert!(context.contains("x: uint ="));
        assert!(context.contains('^'));
    }
}
