//! Recursive-descent parser for UML source, producing the raw syntax
//! tree defined in [`crate::cst`].

mod expressions;
mod statements;

use crate::cst::Module;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, SpannedToken};
use crate::span::Span;
use crate::token::{LayoutToken, Token};

pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> &SpannedToken {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn advance(&mut self) -> SpannedToken {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check_raw(&self, expected: &Token) -> bool {
        matches!(&self.current().token, LayoutToken::Raw(t) if t == expected)
    }

    fn eat_raw(&mut self, expected: Token, what: &str) -> ParseResult<SpannedToken> {
        if self.check_raw(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn eat_layout(&mut self, expected: LayoutToken, what: &str) -> ParseResult<SpannedToken> {
        if self.current().token == expected {
            Ok(self.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn eat_name(&mut self, what: &str) -> ParseResult<(String, Span)> {
        match &self.current().token {
            LayoutToken::Raw(Token::Name(s)) => {
                let s = s.clone();
                let span = self.current_span();
                self.advance();
                Ok((s, span))
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn skip_newlines(&mut self) {
        while self.check_raw(&Token::Newline) {
            self.advance();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let span = self.current_span();
        match &self.current().token {
            LayoutToken::Eof => ParseError::UnexpectedEof {
                expected: expected.to_string(),
                span,
            },
            other => ParseError::UnexpectedToken {
                found: other.to_string(),
                expected: expected.to_string(),
                span,
            },
        }
    }

    fn parse_module(&mut self) -> ParseResult<Module> {
        let mut body = Vec::new();
        self.skip_newlines();
        while !matches!(self.current().token, LayoutToken::Eof) {
            body.push(self.parse_top_level_stmt()?);
            self.skip_newlines();
        }
        Ok(Module { body })
    }
}

/// Parse a complete UML module from source text.
pub fn parse(source: &str) -> ParseResult<Module> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_module()
}

#[cfg(test)]
mod tests;
