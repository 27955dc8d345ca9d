//! The raw syntax tree produced by [`crate::parser::parse`].
//!
//! This is the tree shape `umlc`'s frontend lowerer consumes — the
//! collaborator spec.md §6 calls "the host syntax parser", kept
//! deliberately close to the node set and field names of Python's own
//! `ast` module (the language UML's surface is a subset of). There is no
//! `Attribute` node: a builtin call like `um.putchar(...)` is lexed as a
//! single dotted [`Name`] (`id: "um.putchar"`) rather than a
//! `Name`/`Attribute` pair, since `Attribute` isn't part of the tree
//! shape spec.md §6 enumerates and UML has no other use for attribute
//! access.

use serde::{Deserialize, Serialize};

/// 1-indexed line and 0-indexed column, mirroring Python's
/// `(lineno, col_offset)` pair used for diagnostics throughout the
/// lowerer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub lineno: usize,
    pub col_offset: usize,
}

impl Pos {
    pub fn new(lineno: usize, col_offset: usize) -> Self {
        Self { lineno, col_offset }
    }
}

/// A value constant: Python's `NameConstant`, restricted to the three
/// literals UML accepts (`None`, `True`, `False`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameConstant {
    None,
    True,
    False,
}

/// The context a `Name` reference appears in — assignment target or
/// value read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ctx {
    Load,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mult,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    UAdd,
    USub,
    Invert,
    Not,
}

/// A function parameter together with its `name: Type` annotation, if any.
///
/// The annotation is optional at the tree level even though every accepted
/// parameter must carry one — that rejection (spec.md §4.1) is a semantic
/// check made by the lowerer, not a grammar restriction, exactly as
/// Python's own `ast.arg` doesn't require an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub arg: String,
    pub annotation: Option<Expr>,
    pub pos: Pos,
}

/// A function's full parameter list, mirroring Python's `ast.arguments`.
///
/// UML's accepted surface only ever uses `args`; the remaining fields
/// exist so the lowerer can *see* `*args`/`**kwargs`/defaults/keyword-only
/// parameters and reject them with a diagnostic that points at the
/// offending parameter, rather than the parser silently refusing to
/// accept the syntax at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Arguments {
    pub args: Vec<Arg>,
    pub vararg: Option<Arg>,
    pub kwonlyargs: Vec<Arg>,
    pub kw_defaults: Vec<Option<Expr>>,
    pub kwarg: Option<Arg>,
    pub defaults: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Number(u64),
    Str(String),
    List(Vec<Expr>),
    NameConstant(NameConstant),
    Name { id: String, ctx: Ctx },
    BinOp { left: Box<Expr>, op: Operator, right: Box<Expr> },
    UnaryOp { op: UnaryOperator, operand: Box<Expr> },
    Subscript { value: Box<Expr>, slice: Box<Expr> },
    Call { func: Box<Expr>, args: Vec<Expr>, keywords: Vec<Keyword> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Pos,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    For {
        target: Box<Expr>,
        iter: Box<Expr>,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    If {
        test: Box<Expr>,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    Assign {
        targets: Vec<Expr>,
        value: Box<Expr>,
    },
    AnnAssign {
        target: Box<Expr>,
        annotation: Box<Expr>,
        value: Box<Expr>,
    },
    Return {
        value: Option<Box<Expr>>,
    },
    FunctionDef {
        name: String,
        args: Arguments,
        body: Vec<Stmt>,
        returns: Option<Box<Expr>>,
        decorator_list: Vec<Expr>,
    },
    /// An expression evaluated for its side effect — the only statement
    /// form a bare `Call` can appear in.
    Expr {
        value: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Pos,
}

impl Stmt {
    pub fn new(kind: StmtKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}

/// The root of a parsed UML module: a flat list of top-level statements
/// (only `AnnAssign` and `FunctionDef` are legal at this level; the
/// lowerer enforces that, not the parser).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Module {
    pub body: Vec<Stmt>,
}
