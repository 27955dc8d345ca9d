//! Pass 1 — global discovery (spec.md §4.1).
//!
//! Walks the top-level statement list once, recognizing only `AnnAssign`
//! (globals) and `FunctionDef` (function signatures). Function bodies are
//! carried along unlowered; [`super::pass2_body`] translates them once every
//! signature in the module is known, so a function can call another defined
//! later in the file, or itself.

use std::rc::Rc;

use umlc_parser::cst;

use crate::error::Diagnostic;
use crate::ir::{Expr as IrExpr, FunctionDef, Type, Var, VarKind};

use super::scope::GlobalScope;
use super::{SourceContext, TopLevelItem};

/// A function signature plus its not-yet-lowered body, threaded from Pass 1
/// into Pass 2.
pub(crate) struct ParsedFunction {
    pub(crate) def: FunctionDef,
    pub(crate) raw_body: Vec<cst::Stmt>,
}

pub(crate) struct Pass1Output {
    pub(crate) scope: GlobalScope,
    pub(crate) items: Vec<TopLevelItem>,
    pub(crate) functions: Vec<ParsedFunction>,
}

pub(crate) fn run(module: &cst::Module, ctx: &SourceContext) -> Result<Pass1Output, Diagnostic> {
    let mut scope = GlobalScope::new();
    let mut items = Vec::new();
    let mut functions = Vec::new();

    for stmt in &module.body {
        match &stmt.kind {
            cst::StmtKind::AnnAssign { target, annotation, value } => {
                let name = match &target.kind {
                    cst::ExprKind::Name { id, .. } => id.clone(),
                    _ => {
                        return Err(Diagnostic::syntax(
                            "only a plain name may be annotated at module scope",
                            ctx.location(target.pos),
                        ))
                    }
                };
                let declared_ty = annotation_type(annotation, ctx)?;
                let initializer = lower_const_expr(value, &scope, ctx)?;
                if initializer.ty() != declared_ty {
                    return Err(Diagnostic::ty(
                        format!("'{name}' is declared {declared_ty} but initialized with a {}", initializer.ty()),
                        ctx.location(stmt.pos),
                    ));
                }
                let global = scope.declare_global(&name, declared_ty, initializer, ctx.location(stmt.pos))?;
                items.push(TopLevelItem::Global(global));
            }

            cst::StmtKind::Assign { .. } => {
                return Err(Diagnostic::syntax(
                    "module-scope assignments require a type annotation",
                    ctx.location(stmt.pos),
                ));
            }

            cst::StmtKind::FunctionDef { name, args, body, returns, decorator_list } => {
                if !decorator_list.is_empty() {
                    return Err(Diagnostic::syntax("decorators are not supported", ctx.location(stmt.pos)));
                }
                reject_unsupported_parameters(args, ctx)?;

                let return_type = match returns {
                    Some(expr) => annotation_type(expr, ctx)?,
                    None => Type::Void,
                };

                let mut arg_vars = Vec::with_capacity(args.args.len());
                for (slot, arg) in args.args.iter().enumerate() {
                    let annotation = arg.annotation.as_ref().ok_or_else(|| {
                        Diagnostic::syntax(format!("parameter '{}' is missing a type annotation", arg.arg), ctx.location(arg.pos))
                    })?;
                    let ty = annotation_type(annotation, ctx)?;
                    arg_vars.push(Var::new(arg.arg.clone(), ty, VarKind::Argument, slot));
                }

                let def = scope.declare_function(name, arg_vars, return_type, ctx.location(stmt.pos))?;
                items.push(TopLevelItem::Function(def.clone()));
                functions.push(ParsedFunction { def, raw_body: body.clone() });
            }

            _ => return Err(Diagnostic::internal("unexpected statement at module scope")),
        }
    }

    Ok(Pass1Output { scope, items, functions })
}

fn reject_unsupported_parameters(args: &cst::Arguments, ctx: &SourceContext) -> Result<(), Diagnostic> {
    if let Some(arg) = &args.vararg {
        return Err(Diagnostic::syntax(format!("variadic parameter '*{}' is not supported", arg.arg), ctx.location(arg.pos)));
    }
    if let Some(arg) = args.kwonlyargs.first() {
        return Err(Diagnostic::syntax(
            format!("keyword-only parameter '{}' is not supported", arg.arg),
            ctx.location(arg.pos),
        ));
    }
    if let Some(arg) = &args.kwarg {
        return Err(Diagnostic::syntax(format!("'**{}' is not supported", arg.arg), ctx.location(arg.pos)));
    }
    if let Some(default) = args.defaults.first() {
        return Err(Diagnostic::syntax("default parameter values are not supported", ctx.location(default.pos)));
    }
    Ok(())
}

pub(crate) fn annotation_type(expr: &cst::Expr, ctx: &SourceContext) -> Result<Type, Diagnostic> {
    match &expr.kind {
        cst::ExprKind::Name { id, .. } => match id.as_str() {
            "uint" => Ok(Type::Uint),
            "array" => Ok(Type::Array),
            "void" => Ok(Type::Void),
            other => Err(Diagnostic::syntax(format!("unknown type annotation '{other}'"), ctx.location(expr.pos))),
        },
        _ => Err(Diagnostic::syntax(
            "a type annotation must be a bare name (uint, array, or void)",
            ctx.location(expr.pos),
        )),
    }
}

/// Lower a global's initializer in isolation (spec.md §4.1: "the initializer
/// expression is lowered in isolation"). Only literal forms are legal here —
/// a global's value is baked into the bootstrap preamble at compile time, so
/// it can never reference a variable or a call.
fn lower_const_expr(expr: &cst::Expr, scope: &GlobalScope, ctx: &SourceContext) -> Result<IrExpr, Diagnostic> {
    match &expr.kind {
        cst::ExprKind::Number(n) => {
            let v = u32::try_from(*n).map_err(|_| Diagnostic::range(format!("literal {n} exceeds uint range"), ctx.location(expr.pos)))?;
            Ok(IrExpr::UIntLiteral(v))
        }
        cst::ExprKind::Str(s) => {
            if !s.is_ascii() {
                return Err(Diagnostic::range("string literals must be ASCII", ctx.location(expr.pos)));
            }
            let bytes: Vec<u32> = s.bytes().map(u32::from).collect();
            Ok(IrExpr::ArrayLiteral { id: scope.fresh_array_id(), bytes: Rc::new(bytes) })
        }
        cst::ExprKind::List(elements) => {
            let mut bytes = Vec::with_capacity(elements.len());
            for el in elements {
                match &el.kind {
                    cst::ExprKind::Number(n) => {
                        let v =
                            u32::try_from(*n).map_err(|_| Diagnostic::range(format!("literal {n} exceeds uint range"), ctx.location(el.pos)))?;
                        bytes.push(v);
                    }
                    _ => return Err(Diagnostic::syntax("array literal elements must be uint literals", ctx.location(el.pos))),
                }
            }
            Ok(IrExpr::ArrayLiteral { id: scope.fresh_array_id(), bytes: Rc::new(bytes) })
        }
        _ => Err(Diagnostic::syntax("a global initializer must be a literal", ctx.location(expr.pos))),
    }
}

#[cfg(test)]
mod tests;
