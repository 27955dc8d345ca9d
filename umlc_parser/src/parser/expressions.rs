use super::Parser;
use crate::cst::{Ctx, Expr, ExprKind, Keyword, NameConstant, Operator, Pos, UnaryOperator};
use crate::error::ParseResult;
use crate::span::Span;
use crate::token::{LayoutToken, Token};

fn pos_of(span: Span) -> Pos {
    Pos::new(span.start_line, span.start_column.saturating_sub(1))
}

impl Parser {
    /// `expr := term (('+' | '-') term)*`
    pub(super) fn parse_expr(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match &self.current().token {
                LayoutToken::Raw(Token::Plus) => Operator::Add,
                LayoutToken::Raw(Token::Minus) => Operator::Sub,
                _ => break,
            };
            let pos = lhs.pos;
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::new(
                ExprKind::BinOp {
                    left: Box::new(lhs),
                    op,
                    right: Box::new(rhs),
                },
                pos,
            );
        }
        Ok(lhs)
    }

    /// `term := unary (('*' | '/') unary)*`
    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match &self.current().token {
                LayoutToken::Raw(Token::Star) => Operator::Mult,
                LayoutToken::Raw(Token::Slash) => Operator::Div,
                _ => break,
            };
            let pos = lhs.pos;
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::new(
                ExprKind::BinOp {
                    left: Box::new(lhs),
                    op,
                    right: Box::new(rhs),
                },
                pos,
            );
        }
        Ok(lhs)
    }

    /// `unary := ('+' | '-' | '~' | 'not') unary | postfix`
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match &self.current().token {
            LayoutToken::Raw(Token::Plus) => Some(UnaryOperator::UAdd),
            LayoutToken::Raw(Token::Minus) => Some(UnaryOperator::USub),
            LayoutToken::Raw(Token::Tilde) => Some(UnaryOperator::Invert),
            LayoutToken::Raw(Token::Not) => Some(UnaryOperator::Not),
            _ => None,
        };
        if let Some(op) = op {
            let span = self.current_span();
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::new(
                ExprKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
                pos_of(span),
            ));
        }
        self.parse_postfix()
    }

    /// `postfix := primary ('[' expr ']' | '(' args ')')*`
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match &self.current().token {
                LayoutToken::Raw(Token::LBracket) => {
                    let pos = expr.pos;
                    self.advance();
                    let index = self.parse_expr()?;
                    self.eat_raw(Token::RBracket, "']'")?;
                    expr = Expr::new(
                        ExprKind::Subscript {
                            value: Box::new(expr),
                            slice: Box::new(index),
                        },
                        pos,
                    );
                }
                LayoutToken::Raw(Token::LParen) => {
                    let pos = expr.pos;
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check_raw(&Token::RParen) {
                        args.push(self.parse_expr()?);
                        while self.check_raw(&Token::Comma) {
                            self.advance();
                            if self.check_raw(&Token::RParen) {
                                break;
                            }
                            args.push(self.parse_expr()?);
                        }
                    }
                    self.eat_raw(Token::RParen, "')'")?;
                    expr = Expr::new(
                        ExprKind::Call {
                            func: Box::new(expr),
                            args,
                            keywords: Vec::<Keyword>::new(),
                        },
                        pos,
                    );
                }
                LayoutToken::Raw(Token::Dot) => {
                    // Only legal as part of a dotted call target
                    // (`um.putchar`); fold `Name('um') . Name('putchar')`
                    // into a single dotted `Name`, since the external
                    // tree shape (spec.md §6) has no `Attribute` node.
                    let pos = expr.pos;
                    self.advance();
                    let (attr, _) = self.eat_name("a builtin name")?;
                    let ExprKind::Name { id, ctx } = expr.kind else {
                        return Err(self.unexpected("a module name before '.'"));
                    };
                    expr = Expr::new(ExprKind::Name { id: format!("{id}.{attr}"), ctx }, pos);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// `primary := NUMBER | STRING | 'None' | 'True' | 'False' | '[' ... ']'
    ///           | NAME | '(' expr ')'`
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let span = self.current_span();
        let pos = pos_of(span);
        match self.current().token.clone() {
            LayoutToken::Raw(Token::Number(s)) => {
                self.advance();
                let value: u64 = s
                    .parse()
                    .map_err(|_| crate::error::ParseError::InvalidNumber { literal: s, span })?;
                Ok(Expr::new(ExprKind::Number(value), pos))
            }
            LayoutToken::Raw(Token::Str(s)) => {
                self.advance();
                Ok(Expr::new(ExprKind::Str(s), pos))
            }
            LayoutToken::Raw(Token::None) => {
                self.advance();
                Ok(Expr::new(ExprKind::NameConstant(NameConstant::None), pos))
            }
            LayoutToken::Raw(Token::True) => {
                self.advance();
                Ok(Expr::new(ExprKind::NameConstant(NameConstant::True), pos))
            }
            LayoutToken::Raw(Token::False) => {
                self.advance();
                Ok(Expr::new(ExprKind::NameConstant(NameConstant::False), pos))
            }
            LayoutToken::Raw(Token::Name(id)) => {
                self.advance();
                Ok(Expr::new(ExprKind::Name { id, ctx: Ctx::Load }, pos))
            }
            LayoutToken::Raw(Token::LBracket) => {
                self.advance();
                let mut elts = Vec::new();
                if !self.check_raw(&Token::RBracket) {
                    elts.push(self.parse_expr()?);
                    while self.check_raw(&Token::Comma) {
                        self.advance();
                        if self.check_raw(&Token::RBracket) {
                            break;
                        }
                        elts.push(self.parse_expr()?);
                    }
                }
                self.eat_raw(Token::RBracket, "']'")?;
                Ok(Expr::new(ExprKind::List(elts), pos))
            }
            LayoutToken::Raw(Token::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.eat_raw(Token::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}
