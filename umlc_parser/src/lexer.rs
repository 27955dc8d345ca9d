//! Lexer for UML source code.
//!
//! Wraps the `logos`-generated [`Token`] stream with indentation
//! tracking, the way the teacher's `lexer.rs` "wraps the logos-generated
//! lexer with additional functionality for block comments, strings, and
//! other complex tokens" — here the "complex token" is the synthesized
//! `Indent`/`Dedent`/`Newline` layer that a flat regex lexer can't
//! express on its own.

use logos::Logos;

use crate::error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::{LayoutToken, Token};

/// A layout token with its span.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: LayoutToken,
    pub span: Span,
}

/// Indentation-aware UML lexer.
///
/// Blank lines and comment-only lines never trigger `Newline`, `Indent`,
/// or `Dedent` — only lines that contain real tokens affect layout,
/// matching Python's own tokenizer behavior.
pub struct Lexer<'a> {
    lines: Vec<&'a str>,
    line_no: usize,
    indents: Vec<usize>,
    pending: std::collections::VecDeque<SpannedToken>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            line_no: 0,
            indents: vec![0],
            pending: std::collections::VecDeque::new(),
            done: false,
        }
    }

    fn span_for_line(&self, line_no: usize, col: usize, len: usize) -> Span {
        // `line_no` is 0-indexed here; `SourceMap` is byte-offset based,
        // so approximate using line/col directly since callers only need
        // line/column for diagnostics, not byte offsets across lines.
        Span::new(0, 0, line_no + 1, line_no + 1, col + 1, col + 1 + len)
    }

    fn indent_of(line: &str) -> usize {
        line.chars().take_while(|c| *c == ' ').count()
    }

    fn is_blank(line: &str) -> bool {
        let trimmed = line.trim_start();
        trimmed.is_empty() || trimmed.starts_with('#')
    }

    /// Advance to the next physical, non-blank line and emit any
    /// Indent/Dedent/Newline tokens implied by the transition, then lex
    /// that line's tokens into `self.pending`.
    fn pump_line(&mut self) -> ParseResult<()> {
        loop {
            if self.line_no >= self.lines.len() {
                while self.indents.len() > 1 {
                    self.indents.pop();
                    self.pending.push_back(SpannedToken {
                        token: LayoutToken::Dedent,
                        span: self.span_for_line(self.line_no.saturating_sub(1), 0, 0),
                    });
                }
                self.pending.push_back(SpannedToken {
                    token: LayoutToken::Eof,
                    span: self.span_for_line(self.line_no.saturating_sub(1).max(0), 0, 0),
                });
                self.done = true;
                return Ok(());
            }

            let line = self.lines[self.line_no];
            if Self::is_blank(line) {
                self.line_no += 1;
                continue;
            }

            let indent = Self::indent_of(line);
            let current = *self.indents.last().unwrap();
            if indent > current {
                self.indents.push(indent);
                self.pending.push_back(SpannedToken {
                    token: LayoutToken::Indent,
                    span: self.span_for_line(self.line_no, 0, indent),
                });
            } else {
                while *self.indents.last().unwrap() > indent {
                    self.indents.pop();
                    self.pending.push_back(SpannedToken {
                        token: LayoutToken::Dedent,
                        span: self.span_for_line(self.line_no, 0, indent),
                    });
                }
                if *self.indents.last().unwrap() != indent {
                    return Err(ParseError::BadDedent {
                        span: self.span_for_line(self.line_no, 0, indent),
                    });
                }
            }

            self.lex_line_tokens(line)?;
            self.pending.push_back(SpannedToken {
                token: LayoutToken::Raw(Token::Newline),
                span: self.span_for_line(self.line_no, line.len(), 0),
            });
            self.line_no += 1;
            return Ok(());
        }
    }

    fn lex_line_tokens(&mut self, line: &str) -> ParseResult<()> {
        let body = &line[..];
        let mut inner = Token::lexer(body);
        while let Some(result) = inner.next() {
            let span_range = inner.span();
            match result {
                Ok(Token::Newline) => {}
                Ok(tok) => {
                    self.pending.push_back(SpannedToken {
                        token: LayoutToken::Raw(tok),
                        span: self.span_for_line(
                            self.line_no,
                            span_range.start,
                            span_range.end - span_range.start,
                        ),
                    });
                }
                Err(()) => {
                    return Err(ParseError::UnrecognizedCharacter {
                        found: inner.slice().to_string(),
                        span: self.span_for_line(
                            self.line_no,
                            span_range.start,
                            span_range.end - span_range.start,
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn next_token(&mut self) -> ParseResult<SpannedToken> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Ok(tok);
            }
            if self.done {
                return Ok(SpannedToken {
                    token: LayoutToken::Eof,
                    span: self.span_for_line(self.line_no.saturating_sub(1).max(0), 0, 0),
                });
            }
            self.pump_line()?;
        }
    }

    /// Lex the entire source into a token vector, used by the parser.
    pub fn tokenize(mut self) -> ParseResult<Vec<SpannedToken>> {
        let mut out = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = matches!(tok.token, LayoutToken::Eof);
            out.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(out)
    }
}

pub fn tokenize(source: &str) -> ParseResult<Vec<SpannedToken>> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<LayoutToken> {
        tokenize(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn simple_assignment() {
        let toks = kinds("x: uint = 1\n");
        assert_eq!(
            toks,
            vec![
                LayoutToken::Raw(Token::Name("x".into())),
                LayoutToken::Raw(Token::Colon),
                LayoutToken::Raw(Token::Name("uint".into())),
                LayoutToken::Raw(Token::Equals),
                LayoutToken::Raw(Token::Number("1".into())),
                LayoutToken::Raw(Token::Newline),
                LayoutToken::Eof,
            ]
        );
    }

    #[test]
    fn indent_and_dedent() {
        let toks = kinds("def f() -> uint:\n    return 0\nx: uint = 1\n");
        assert!(toks.contains(&LayoutToken::Indent));
        assert!(toks.contains(&LayoutToken::Dedent));
    }

    #[test]
    fn blank_lines_are_ignored_for_layout() {
        let toks = kinds("def f() -> uint:\n\n    return 0\n");
        // exactly one indent, no spurious dedents from the blank line
        assert_eq!(toks.iter().filter(|t| **t == LayoutToken::Indent).count(), 1);
    }

    #[test]
    fn bad_dedent_is_an_error() {
        let err = tokenize("def f() -> uint:\n    return 0\n  return 1\n");
        assert!(matches!(err, Err(ParseError::BadDedent { .. })));
    }
}
