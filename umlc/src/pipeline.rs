//! End-to-end compilation: source text in, UM bytecode out.
//!
//! Wires together the host parser, the frontend lowerer, the static
//! allocator, the codegen driver and the bootstrap preamble (spec.md §1's
//! pipeline diagram).

use std::collections::HashMap;
use std::rc::Rc;

use crate::compile::bootstrap::{self, AllocContent};
use crate::compile::codegen;
use crate::compile::static_allocator::{AllocKey, StaticAllocator};
use crate::error::{Diagnostic, Location};
use crate::ir::{AssignTarget, Expr, FunctionDef, Stmt, Type};
use crate::isa::{self, Instruction};
use crate::lowering::{self, TopLevelItem};

/// Compile one UML source file into a serialized UM program.
pub fn compile(source: &str, filename: &str) -> Result<Vec<u8>, Diagnostic> {
    let module = umlc_parser::parse(source).map_err(|err| parse_diagnostic(&err, filename, source))?;
    let lowered = lowering::lower_module(&module, filename, source)?;

    let mut allocator = StaticAllocator::new();
    for item in &lowered.items {
        match item {
            TopLevelItem::Function(f) => {
                allocator.static_address(AllocKey::Function(f.clone()));
            }
            TopLevelItem::Global(g) if g.ty() == Type::Array => {
                allocator.static_address(AllocKey::Global(g.clone()));
            }
            TopLevelItem::Global(_) => {}
        }
    }

    let mut array_literals: HashMap<usize, Rc<Vec<u32>>> = HashMap::new();
    for item in &lowered.items {
        match item {
            TopLevelItem::Global(g) => collect_expr_literals(&g.0.initializer, &mut array_literals),
            TopLevelItem::Function(f) => collect_function_literals(f, &mut array_literals),
        }
    }

    let mut code_by_name: HashMap<String, Vec<Instruction>> = HashMap::new();
    for item in &lowered.items {
        if let TopLevelItem::Function(f) = item {
            let instructions = codegen::compile_function(f.clone(), &mut allocator)?;
            code_by_name.insert(f.name().to_string(), instructions);
        }
    }

    let main_pic_index = allocator.static_address(AllocKey::Function(lowered.main.clone()));

    let mut allocations = Vec::with_capacity(allocator.len());
    for key in allocator.entries() {
        let content = match key {
            AllocKey::Function(f) => {
                let code = code_by_name
                    .get(f.name())
                    .cloned()
                    .ok_or_else(|| Diagnostic::internal(format!("function '{}' was never compiled", f.name())))?;
                AllocContent::Code(code)
            }
            AllocKey::Global(g) => match &g.0.initializer {
                Expr::ArrayLiteral { bytes, .. } => AllocContent::Data((**bytes).clone()),
                _ => return Err(Diagnostic::internal(format!("global '{}' is array-typed but lacks an array initializer", g.name()))),
            },
            AllocKey::ArrayLiteral(id) => {
                let bytes = array_literals
                    .get(id)
                    .ok_or_else(|| Diagnostic::internal(format!("array literal #{id} was never lowered")))?;
                AllocContent::Data((**bytes).clone())
            }
        };
        allocations.push(content);
    }

    let instructions = bootstrap::emit_bootstrap(&allocations, main_pic_index)?;
    Ok(isa::serialize(&instructions))
}

fn parse_diagnostic(err: &umlc_parser::ParseError, filename: &str, source: &str) -> Diagnostic {
    let span = err.span();
    let lines: Vec<&str> = source.lines().collect();
    let source_line = lines.get(span.start_line.saturating_sub(1)).copied().unwrap_or("").to_string();
    let location = Location::new(filename, span.start_line, span.start_column, source_line);
    Diagnostic::syntax(err.to_string(), location)
}

fn collect_function_literals(function: &FunctionDef, out: &mut HashMap<usize, Rc<Vec<u32>>>) {
    for stmt in &function.0.body {
        collect_stmt_literals(stmt, out);
    }
}

fn collect_stmt_literals(stmt: &Stmt, out: &mut HashMap<usize, Rc<Vec<u32>>>) {
    match stmt {
        Stmt::Assignment { lhs, rhs } => {
            if let AssignTarget::Subscript { array, index } = lhs {
                collect_expr_literals(array, out);
                collect_expr_literals(index, out);
            }
            collect_expr_literals(rhs, out);
        }
        Stmt::If { test, then_body, else_body } => {
            collect_expr_literals(test, out);
            then_body.iter().for_each(|s| collect_stmt_literals(s, out));
            else_body.iter().for_each(|s| collect_stmt_literals(s, out));
        }
        Stmt::For { iterator, body, .. } => {
            collect_expr_literals(iterator, out);
            body.iter().for_each(|s| collect_stmt_literals(s, out));
        }
        Stmt::Return(value) => {
            if let Some(expr) = value {
                collect_expr_literals(expr, out);
            }
        }
        Stmt::Expr(expr) => collect_expr_literals(expr, out),
    }
}

fn collect_expr_literals(expr: &Expr, out: &mut HashMap<usize, Rc<Vec<u32>>>) {
    match expr {
        Expr::ArrayLiteral { id, bytes } => {
            out.insert(*id, bytes.clone());
        }
        Expr::BinOp { lhs, rhs, .. } => {
            collect_expr_literals(lhs, out);
            collect_expr_literals(rhs, out);
        }
        Expr::UnOp { operand, .. } => collect_expr_literals(operand, out),
        Expr::Subscript { array, index } => {
            collect_expr_literals(array, out);
            collect_expr_literals(index, out);
        }
        Expr::Call { args, .. } | Expr::BuiltinCall { args, .. } => {
            args.iter().for_each(|a| collect_expr_literals(a, out));
        }
        Expr::UIntLiteral(_) | Expr::Argument(_) | Expr::Local(_) | Expr::Global(_) => {}
    }
}

#[cfg(test)]
mod tests;
