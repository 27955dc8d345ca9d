//! Pass 2 — body translation (spec.md §4.1).
//!
//! Translates each function's raw statement list into typed IR, one
//! function at a time, against the signatures Pass 1 already recorded.

use std::rc::Rc;

use umlc_parser::cst;

use crate::builtins::Builtin;
use crate::error::Diagnostic;
use crate::ir::{AssignTarget, BinOpKind, Expr, FunctionDef, FunctionDefData, Stmt, Type, UnOpKind, VarKind};

use super::pass1_globals::{annotation_type, ParsedFunction};
use super::scope::{FunctionScope, GlobalScope};
use super::SourceContext;

pub(crate) fn run(scope: &GlobalScope, parsed: Vec<ParsedFunction>, ctx: &SourceContext) -> Result<Vec<FunctionDef>, Diagnostic> {
    let mut finalized = Vec::with_capacity(parsed.len());
    for ParsedFunction { def, raw_body } in parsed {
        let vars = FunctionScope::new(def.0.args.clone());
        let mut lowerer = BodyLowerer { scope, vars, ctx, return_type: def.return_type() };
        let body = lowerer.lower_block(&raw_body)?;
        let locals = lowerer.vars.into_locals();
        finalized.push(FunctionDef(Rc::new(FunctionDefData {
            name: def.name().to_string(),
            args: def.0.args.clone(),
            locals,
            body,
            return_type: def.return_type(),
        })));
    }
    Ok(finalized)
}

struct BodyLowerer<'a> {
    scope: &'a GlobalScope,
    vars: FunctionScope,
    ctx: &'a SourceContext,
    return_type: Type,
}

impl<'a> BodyLowerer<'a> {
    /// Translate a nested statement list (an `if`/`else` or `for` body) into
    /// its own, isolated IR statement list.
    fn lower_block(&mut self, stmts: &[cst::Stmt]) -> Result<Vec<Stmt>, Diagnostic> {
        stmts.iter().map(|stmt| self.lower_stmt(stmt)).collect()
    }

    fn lower_stmt(&mut self, stmt: &cst::Stmt) -> Result<Stmt, Diagnostic> {
        match &stmt.kind {
            cst::StmtKind::Assign { targets, value } => self.lower_assign(targets, value, stmt.pos),
            cst::StmtKind::AnnAssign { target, annotation, value } => self.lower_ann_assign(target, annotation, value, stmt.pos),
            cst::StmtKind::If { test, body, orelse } => {
                let test = self.lower_expr(test)?;
                if test.ty() != Type::Uint {
                    return Err(self.ty_err(format!("`if` condition must be uint, found {}", test.ty()), stmt.pos));
                }
                let then_body = self.lower_block(body)?;
                let else_body = self.lower_block(orelse)?;
                Ok(Stmt::If { test, then_body, else_body })
            }
            cst::StmtKind::For { target, iter, body, orelse } => self.lower_for(target, iter, body, orelse, stmt.pos),
            cst::StmtKind::Return { value } => self.lower_return(value.as_deref(), stmt.pos),
            cst::StmtKind::Expr { value } => Ok(Stmt::Expr(self.lower_expr(value)?)),
            cst::StmtKind::FunctionDef { .. } => Err(self.syntax_err("nested function definitions are not supported", stmt.pos)),
        }
    }

    fn lower_assign(&mut self, targets: &[cst::Expr], value: &cst::Expr, pos: cst::Pos) -> Result<Stmt, Diagnostic> {
        let target = match targets {
            [single] => single,
            _ => return Err(self.syntax_err("chained assignment is not supported", pos)),
        };
        match &target.kind {
            cst::ExprKind::Name { id, .. } => {
                if self.scope.lookup_global(id).is_some() && self.vars.resolve(id).is_none() {
                    return Err(self.name_err(format!("cannot assign to global '{id}'"), target.pos));
                }
                let var = self
                    .vars
                    .resolve(id)
                    .ok_or_else(|| Diagnostic::name(format!("'{id}' is not defined"), self.ctx.location(target.pos)))?;
                let rhs = self.lower_expr(value)?;
                if rhs.ty() != var.ty() {
                    return Err(self.ty_err(format!("cannot assign a {} to '{id}' (declared {})", rhs.ty(), var.ty()), pos));
                }
                Ok(Stmt::Assignment { lhs: AssignTarget::Var(var), rhs })
            }
            cst::ExprKind::Subscript { value: array, slice } => {
                let array = self.lower_expr(array)?;
                if array.ty() != Type::Array {
                    return Err(self.ty_err(format!("subscript assignment target must be array, found {}", array.ty()), pos));
                }
                let index = self.lower_expr(slice)?;
                if index.ty() != Type::Uint {
                    return Err(self.ty_err(format!("array index must be uint, found {}", index.ty()), pos));
                }
                let rhs = self.lower_expr(value)?;
                if rhs.ty() != Type::Uint {
                    return Err(self.ty_err(format!("array elements are uint, found {}", rhs.ty()), pos));
                }
                Ok(Stmt::Assignment { lhs: AssignTarget::Subscript { array, index }, rhs })
            }
            _ => Err(self.syntax_err("invalid assignment target", target.pos)),
        }
    }

    fn lower_ann_assign(&mut self, target: &cst::Expr, annotation: &cst::Expr, value: &cst::Expr, pos: cst::Pos) -> Result<Stmt, Diagnostic> {
        let name = match &target.kind {
            cst::ExprKind::Name { id, .. } => id.clone(),
            _ => return Err(self.syntax_err("only a plain name may be annotated", target.pos)),
        };
        let declared_ty = annotation_type(annotation, self.ctx)?;
        let rhs = self.lower_expr(value)?;
        if rhs.ty() != declared_ty {
            return Err(self.ty_err(format!("'{name}' is declared {declared_ty} but initialized with a {}", rhs.ty()), pos));
        }
        let var = self.vars.declare_local(&name, declared_ty, self.ctx.location(pos))?;
        Ok(Stmt::Assignment { lhs: AssignTarget::Var(var), rhs })
    }

    fn lower_for(&mut self, target: &cst::Expr, iter: &cst::Expr, body: &[cst::Stmt], orelse: &[cst::Stmt], pos: cst::Pos) -> Result<Stmt, Diagnostic> {
        if !orelse.is_empty() {
            return Err(self.syntax_err("`for`/`else` is not supported", pos));
        }
        let name = match &target.kind {
            cst::ExprKind::Name { id, .. } => id.clone(),
            _ => return Err(self.syntax_err("`for` target must be a plain name", target.pos)),
        };
        let iterator = self.lower_expr(iter)?;
        if iterator.ty() != Type::Array {
            return Err(self.ty_err(format!("`for` can only iterate an array, found {}", iterator.ty()), pos));
        }
        let target_var = match self.vars.resolve(&name) {
            Some(var) if var.ty() == Type::Uint => var,
            Some(var) => return Err(self.ty_err(format!("'{name}' is {} but a `for` target must be uint", var.ty()), target.pos)),
            None => self.vars.declare_local(&name, Type::Uint, self.ctx.location(target.pos))?,
        };
        let body = self.lower_block(body)?;
        Ok(Stmt::For { target: target_var, iterator, body })
    }

    fn lower_return(&mut self, value: Option<&cst::Expr>, pos: cst::Pos) -> Result<Stmt, Diagnostic> {
        match (value, self.return_type) {
            (None, Type::Void) => Ok(Stmt::Return(None)),
            (None, Type::Uint) => Ok(Stmt::Return(Some(Expr::UIntLiteral(0)))),
            (None, Type::Array) => Ok(Stmt::Return(Some(Expr::ArrayLiteral { id: self.scope.fresh_array_id(), bytes: Rc::new(Vec::new()) }))),
            (Some(_), Type::Void) => Err(self.ty_err("a void function cannot return a value", pos)),
            (Some(expr), expected) => {
                let lowered = self.lower_expr(expr)?;
                if lowered.ty() != expected {
                    return Err(self.ty_err(format!("function returns {expected} but this `return` produces a {}", lowered.ty()), pos));
                }
                Ok(Stmt::Return(Some(lowered)))
            }
        }
    }

    fn lower_expr(&mut self, expr: &cst::Expr) -> Result<Expr, Diagnostic> {
        match &expr.kind {
            cst::ExprKind::Number(n) => {
                let v = u32::try_from(*n).map_err(|_| self.range_err(format!("literal {n} exceeds uint range"), expr.pos))?;
                Ok(Expr::UIntLiteral(v))
            }
            cst::ExprKind::Str(s) => {
                if !s.is_ascii() {
                    return Err(self.range_err("string literals must be ASCII", expr.pos));
                }
                let bytes = s.bytes().map(u32::from).collect();
                Ok(Expr::ArrayLiteral { id: self.scope.fresh_array_id(), bytes: Rc::new(bytes) })
            }
            cst::ExprKind::List(elements) => {
                let mut bytes = Vec::with_capacity(elements.len());
                for el in elements {
                    match &el.kind {
                        cst::ExprKind::Number(n) => {
                            bytes.push(u32::try_from(*n).map_err(|_| self.range_err(format!("literal {n} exceeds uint range"), el.pos))?);
                        }
                        _ => return Err(self.syntax_err("array literal elements must be uint literals", el.pos)),
                    }
                }
                Ok(Expr::ArrayLiteral { id: self.scope.fresh_array_id(), bytes: Rc::new(bytes) })
            }
            cst::ExprKind::NameConstant(nc) => match nc {
                cst::NameConstant::True => Ok(Expr::UIntLiteral(1)),
                cst::NameConstant::False => Ok(Expr::UIntLiteral(0)),
                cst::NameConstant::None => Err(self.syntax_err("'None' has no value in this language", expr.pos)),
            },
            cst::ExprKind::Name { id, .. } => self.lower_name(id, expr.pos),
            cst::ExprKind::BinOp { left, op, right } => self.lower_binop(left, *op, right, expr.pos),
            cst::ExprKind::UnaryOp { op, operand } => self.lower_unaryop(*op, operand, expr.pos),
            cst::ExprKind::Subscript { value, slice } => {
                let array = self.lower_expr(value)?;
                if array.ty() != Type::Array {
                    return Err(self.ty_err(format!("subscript base must be array, found {}", array.ty()), expr.pos));
                }
                let index = self.lower_expr(slice)?;
                if index.ty() != Type::Uint {
                    return Err(self.ty_err(format!("subscript index must be uint, found {}", index.ty()), expr.pos));
                }
                Ok(Expr::Subscript { array: Box::new(array), index: Box::new(index) })
            }
            cst::ExprKind::Call { func, args, keywords } => self.lower_call(func, args, keywords, expr.pos),
        }
    }

    fn lower_name(&self, id: &str, pos: cst::Pos) -> Result<Expr, Diagnostic> {
        if let Some(var) = self.vars.resolve(id) {
            return Ok(match var.0.kind {
                VarKind::Argument => Expr::Argument(var),
                VarKind::Local => Expr::Local(var),
            });
        }
        if let Some(global) = self.scope.lookup_global(id) {
            return Ok(Expr::Global(global));
        }
        Err(Diagnostic::name(format!("'{id}' is not defined"), self.ctx.location(pos)))
    }

    fn lower_binop(&mut self, left: &cst::Expr, op: cst::Operator, right: &cst::Expr, pos: cst::Pos) -> Result<Expr, Diagnostic> {
        let lhs = self.lower_expr(left)?;
        if lhs.ty() != Type::Uint {
            return Err(self.ty_err(format!("left operand must be uint, found {}", lhs.ty()), pos));
        }
        let rhs = self.lower_expr(right)?;
        if rhs.ty() != Type::Uint {
            return Err(self.ty_err(format!("right operand must be uint, found {}", rhs.ty()), pos));
        }
        let op = match op {
            cst::Operator::Add => BinOpKind::Add,
            cst::Operator::Sub => BinOpKind::Sub,
            cst::Operator::Mult => BinOpKind::Mul,
            cst::Operator::Div => BinOpKind::Div,
        };
        Ok(Expr::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
    }

    fn lower_unaryop(&mut self, op: cst::UnaryOperator, operand: &cst::Expr, pos: cst::Pos) -> Result<Expr, Diagnostic> {
        let operand = self.lower_expr(operand)?;
        if operand.ty() != Type::Uint {
            return Err(self.ty_err(format!("unary operand must be uint, found {}", operand.ty()), pos));
        }
        let op = match op {
            cst::UnaryOperator::UAdd => UnOpKind::Plus,
            cst::UnaryOperator::USub => UnOpKind::Neg,
            cst::UnaryOperator::Invert => UnOpKind::BitNot,
            cst::UnaryOperator::Not => UnOpKind::Not,
        };
        Ok(Expr::UnOp { op, operand: Box::new(operand) })
    }

    fn lower_call(&mut self, func: &cst::Expr, args: &[cst::Expr], keywords: &[cst::Keyword], pos: cst::Pos) -> Result<Expr, Diagnostic> {
        if !keywords.is_empty() {
            return Err(self.syntax_err("keyword arguments are not supported", pos));
        }
        let name = match &func.kind {
            cst::ExprKind::Name { id, .. } => id.as_str(),
            _ => return Err(self.syntax_err("a call target must be a name", func.pos)),
        };

        if let Some(builtin) = Builtin::lookup(name) {
            let expected = builtin.arg_types();
            if args.len() != expected.len() {
                return Err(self.syntax_err(format!("'{name}' takes {} argument(s), found {}", expected.len(), args.len()), pos));
            }
            let mut lowered = Vec::with_capacity(args.len());
            for (arg, ty) in args.iter().zip(expected) {
                let value = self.lower_expr(arg)?;
                if value.ty() != *ty {
                    return Err(self.ty_err(format!("'{name}' expects {ty}, found {}", value.ty()), arg.pos));
                }
                lowered.push(value);
            }
            return Ok(Expr::BuiltinCall { builtin, args: lowered });
        }

        let function = self
            .scope
            .lookup_function(name)
            .ok_or_else(|| Diagnostic::name(format!("unknown function '{name}'"), self.ctx.location(func.pos)))?;
        if args.len() != function.arg_count() {
            return Err(self.syntax_err(format!("'{name}' takes {} argument(s), found {}", function.arg_count(), args.len()), pos));
        }
        let mut lowered = Vec::with_capacity(args.len());
        for (arg, param) in args.iter().zip(function.0.args.iter()) {
            let value = self.lower_expr(arg)?;
            if value.ty() != param.ty() {
                return Err(self.ty_err(format!("'{name}' expects {} for '{}', found {}", param.ty(), param.name(), value.ty()), arg.pos));
            }
            lowered.push(value);
        }
        Ok(Expr::Call { function, args: lowered })
    }

    fn syntax_err(&self, message: impl Into<String>, pos: cst::Pos) -> Diagnostic {
        Diagnostic::syntax(message, self.ctx.location(pos))
    }

    fn ty_err(&self, message: impl Into<String>, pos: cst::Pos) -> Diagnostic {
        Diagnostic::ty(message, self.ctx.location(pos))
    }

    fn name_err(&self, message: impl Into<String>, pos: cst::Pos) -> Diagnostic {
        Diagnostic::name(message, self.ctx.location(pos))
    }

    fn range_err(&self, message: impl Into<String>, pos: cst::Pos) -> Diagnostic {
        Diagnostic::range(message, self.ctx.location(pos))
    }
}
