//! Token kinds for the UML surface syntax.
//!
//! UML is a statically typed, Python-flavored subset: significant
//! indentation, `def`/`return`/`if`/`else`/`for`/`in`, annotated
//! assignment, and a small operator set. Unlike Python proper there is
//! no `elif`, no comparison operators, and no boolean `and`/`or` — the
//! accepted grammar is exactly what spec.md §6 lists.

use logos::Logos;
use std::fmt;

/// A lexical token.
///
/// `Indent`/`Dedent`/`Newline` are synthesized by [`crate::lexer::Lexer`],
/// not by the `logos` definition below, because indentation sensitivity
/// isn't expressible as a regular token regex.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[token("def")]
    Def,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("not")]
    Not,
    #[token("None")]
    None,
    #[token("True")]
    True,
    #[token("False")]
    False,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Name(String),

    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Number(String),

    #[regex(r#""[^"\n]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Str(String),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("~")]
    Tilde,
    #[token("=")]
    Equals,
    #[token("->")]
    Arrow,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    #[token("\n")]
    Newline,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Def => write!(f, "'def'"),
            Token::Return => write!(f, "'return'"),
            Token::If => write!(f, "'if'"),
            Token::Else => write!(f, "'else'"),
            Token::For => write!(f, "'for'"),
            Token::In => write!(f, "'in'"),
            Token::Not => write!(f, "'not'"),
            Token::None => write!(f, "'None'"),
            Token::True => write!(f, "'True'"),
            Token::False => write!(f, "'False'"),
            Token::Name(s) => write!(f, "identifier {s:?}"),
            Token::Number(s) => write!(f, "number {s:?}"),
            Token::Str(s) => write!(f, "string {s:?}"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Tilde => write!(f, "'~'"),
            Token::Equals => write!(f, "'='"),
            Token::Arrow => write!(f, "'->'"),
            Token::Colon => write!(f, "':'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Newline => write!(f, "newline"),
        }
    }
}

/// Tokens synthesized by the indentation-tracking wrapper, layered on
/// top of the raw `logos` token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutToken {
    Raw(Token),
    Indent,
    Dedent,
    Eof,
}

impl fmt::Display for LayoutToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutToken::Raw(t) => write!(f, "{t}"),
            LayoutToken::Indent => write!(f, "indent"),
            LayoutToken::Dedent => write!(f, "dedent"),
            LayoutToken::Eof => write!(f, "end of input"),
        }
    }
}
