use super::Parser;
use crate::cst::{Arg, Arguments, Expr, Pos, Stmt, StmtKind};
use crate::error::ParseResult;
use crate::span::Span;
use crate::token::{LayoutToken, Token};

fn pos_of(span: Span) -> Pos {
    Pos::new(span.start_line, span.start_column.saturating_sub(1))
}

impl Parser {
    /// Only `AnnAssign` and `FunctionDef` are legal at module scope; the
    /// parser enforces the grammar restriction here (anything else isn't
    /// even a sentence in this position), while the *semantic* rejections
    /// spec.md §4.1 Pass 1 describes (redefinition, missing annotation,
    /// bad annotation kind) are left to the lowerer.
    pub(super) fn parse_top_level_stmt(&mut self) -> ParseResult<Stmt> {
        if self.check_raw(&Token::Def) {
            self.parse_function_def()
        } else {
            self.parse_ann_assign()
        }
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.eat_raw(Token::Colon, "':'")?;
        self.eat_raw(Token::Newline, "a newline")?;
        self.skip_newlines();
        self.eat_layout(LayoutToken::Indent, "an indented block")?;
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if self.current().token == LayoutToken::Dedent {
                break;
            }
            stmts.push(self.parse_stmt()?);
        }
        self.eat_layout(LayoutToken::Dedent, "a dedent")?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match &self.current().token {
            LayoutToken::Raw(Token::Def) => self.parse_function_def(),
            LayoutToken::Raw(Token::For) => self.parse_for(),
            LayoutToken::Raw(Token::If) => self.parse_if(),
            LayoutToken::Raw(Token::Return) => self.parse_return(),
            _ => self.parse_assign_or_expr_stmt(),
        }
    }

    fn parse_type_annotation(&mut self) -> ParseResult<Expr> {
        self.parse_expr()
    }

    fn parse_param(&mut self) -> ParseResult<Arg> {
        let span = self.current_span();
        let (name, _) = self.eat_name("a parameter name")?;
        let annotation = if self.check_raw(&Token::Colon) {
            self.advance();
            Some(self.parse_type_annotation()?)
        } else {
            None
        };
        Ok(Arg {
            arg: name,
            annotation,
            pos: pos_of(span),
        })
    }

    /// `params := param? (',' (param | '*' param? | '**' param))* `
    ///
    /// Parses the full Python-shaped parameter list — including
    /// `*args`/`**kwargs`/keyword-only/defaults — so the lowerer can
    /// reject each of those forms with a diagnostic pointing at its
    /// source location, per spec.md §4.1.
    fn parse_params(&mut self) -> ParseResult<Arguments> {
        let mut arguments = Arguments::default();
        let mut seen_star = false;
        if self.check_raw(&Token::RParen) {
            return Ok(arguments);
        }
        loop {
            if self.check_raw(&Token::Star) {
                self.advance();
                seen_star = true;
                if !self.check_raw(&Token::Comma) && !self.check_raw(&Token::RParen) {
                    arguments.vararg = Some(self.parse_param()?);
                }
            } else {
                let param = self.parse_param()?;
                let has_default = self.check_raw(&Token::Equals);
                let default = if has_default {
                    self.advance();
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                if seen_star {
                    arguments.kwonlyargs.push(param);
                    arguments.kw_defaults.push(default);
                } else {
                    arguments.args.push(param);
                    if let Some(default) = default {
                        arguments.defaults.push(default);
                    }
                }
            }
            if self.check_raw(&Token::Comma) {
                self.advance();
                if self.check_raw(&Token::RParen) {
                    break;
                }
                continue;
            }
            break;
        }
        Ok(arguments)
    }

    fn parse_function_def(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.advance(); // 'def'
        let (name, _) = self.eat_name("a function name")?;
        self.eat_raw(Token::LParen, "'('")?;
        let args = self.parse_params()?;
        self.eat_raw(Token::RParen, "')'")?;
        let returns = if self.check_raw(&Token::Arrow) {
            self.advance();
            Some(Box::new(self.parse_type_annotation()?))
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Stmt::new(
            StmtKind::FunctionDef {
                name,
                args,
                body,
                returns,
                decorator_list: Vec::new(),
            },
            pos_of(span),
        ))
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.advance(); // 'for'
        let target = self.parse_expr()?;
        self.eat_raw(Token::In, "'in'")?;
        let iter = self.parse_expr()?;
        let body = self.parse_block()?;
        let orelse = self.parse_optional_else()?;
        Ok(Stmt::new(
            StmtKind::For {
                target: Box::new(target),
                iter: Box::new(iter),
                body,
                orelse,
            },
            pos_of(span),
        ))
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.advance(); // 'if'
        let test = self.parse_expr()?;
        let body = self.parse_block()?;
        let orelse = self.parse_optional_else()?;
        Ok(Stmt::new(
            StmtKind::If {
                test: Box::new(test),
                body,
                orelse,
            },
            pos_of(span),
        ))
    }

    fn parse_optional_else(&mut self) -> ParseResult<Vec<Stmt>> {
        let save = self.pos;
        self.skip_newlines();
        if self.check_raw(&Token::Else) {
            self.advance();
            self.parse_block()
        } else {
            self.pos = save;
            Ok(Vec::new())
        }
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        self.advance(); // 'return'
        let value = if self.check_raw(&Token::Newline) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        self.eat_raw(Token::Newline, "a newline")?;
        Ok(Stmt::new(StmtKind::Return { value }, pos_of(span)))
    }

    fn parse_ann_assign(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        let target = self.parse_expr()?;
        if self.check_raw(&Token::Colon) {
            self.advance();
            let annotation = self.parse_type_annotation()?;
            self.eat_raw(Token::Equals, "'='")?;
            let value = self.parse_expr()?;
            self.eat_raw(Token::Newline, "a newline")?;
            Ok(Stmt::new(
                StmtKind::AnnAssign {
                    target: Box::new(target),
                    annotation: Box::new(annotation),
                    value: Box::new(value),
                },
                pos_of(span),
            ))
        } else if self.check_raw(&Token::Equals) {
            self.advance();
            let value = self.parse_expr()?;
            self.eat_raw(Token::Newline, "a newline")?;
            Ok(Stmt::new(
                StmtKind::Assign {
                    targets: vec![target],
                    value: Box::new(value),
                },
                pos_of(span),
            ))
        } else {
            Err(self.unexpected("':' or '=' after an assignment target"))
        }
    }

    fn parse_assign_or_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let span = self.current_span();
        let first = self.parse_expr()?;
        if self.check_raw(&Token::Colon) || self.check_raw(&Token::Equals) {
            return self.continue_assign(first, span);
        }
        self.eat_raw(Token::Newline, "a newline")?;
        Ok(Stmt::new(
            StmtKind::Expr {
                value: Box::new(first),
            },
            pos_of(span),
        ))
    }

    fn continue_assign(&mut self, target: Expr, span: Span) -> ParseResult<Stmt> {
        if self.check_raw(&Token::Colon) {
            self.advance();
            let annotation = self.parse_type_annotation()?;
            self.eat_raw(Token::Equals, "'='")?;
            let value = self.parse_expr()?;
            self.eat_raw(Token::Newline, "a newline")?;
            return Ok(Stmt::new(
                StmtKind::AnnAssign {
                    target: Box::new(target),
                    annotation: Box::new(annotation),
                    value: Box::new(value),
                },
                pos_of(span),
            ));
        }
        self.advance(); // '='
        let mut targets = vec![target];
        let mut value = self.parse_expr()?;
        while self.check_raw(&Token::Equals) {
            self.advance();
            targets.push(value);
            value = self.parse_expr()?;
        }
        self.eat_raw(Token::Newline, "a newline")?;
        Ok(Stmt::new(
            StmtKind::Assign {
                targets,
                value: Box::new(value),
            },
            pos_of(span),
        ))
    }
}
