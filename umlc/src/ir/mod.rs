//! Typed intermediate representation.
//!
//! IR nodes are immutable sum types built bottom-up during lowering
//! (spec.md §3) and are structurally compared thereafter. `Argument`,
//! `Local`, `Global` and `FunctionDef` are the exception: they are compared
//! by `name` within their scope, not structurally, since the same
//! declaration is referenced from many call sites and must be recognized as
//! "the same variable" rather than "an equal-looking one".

mod core;

pub use core::{
    AssignTarget, BinOpKind, Expr, FunctionDef, FunctionDefData, Global, GlobalData, Stmt, Type,
    UnOpKind, Var, VarData, VarKind,
};

#[cfg(test)]
mod tests;
