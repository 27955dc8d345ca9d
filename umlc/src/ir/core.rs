use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// The type lattice: `uint` (32-bit unsigned), `array` (heap handle whose
/// slot 0 holds its length), `void` (only valid as a return type, or on a
/// void call used as a statement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Uint,
    Array,
    Void,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Type::Uint => "uint",
            Type::Array => "array",
            Type::Void => "void",
        };
        write!(f, "{s}")
    }
}

/// What kind of variable a [`Var`] denotes. Carried alongside the name so a
/// codegen driver can tell an argument slot from a plain local slot without
/// threading extra context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Argument,
    Local,
}

/// Backing data for an [`Argument`](Expr::Argument)/[`Local`](Expr::Local)
/// reference. Allocated once per declaration and shared (via [`Var`]'s `Rc`)
/// across every reference to it, so that two `Expr::Local` nodes naming the
/// same declaration are recognized as the same variable.
#[derive(Debug)]
pub struct VarData {
    pub name: String,
    pub ty: Type,
    pub kind: VarKind,
    /// Flattened slot index within the owning function's LOCALS array.
    /// Arguments occupy the low `|args|` slots (spec.md §4.5); assigned once
    /// during lowering and never mutated afterward.
    pub slot: usize,
}

/// A shared handle to an argument or local declaration. Two `Var`s compare
/// equal iff they name the same declaration, not merely an equal-looking one
/// (spec.md §3: "identity by `name` within their scope").
#[derive(Debug, Clone)]
pub struct Var(pub Rc<VarData>);

impl Var {
    pub fn new(name: impl Into<String>, ty: Type, kind: VarKind, slot: usize) -> Self {
        Var(Rc::new(VarData {
            name: name.into(),
            ty,
            kind,
            slot,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn ty(&self) -> Type {
        self.0.ty
    }

    pub fn slot(&self) -> usize {
        self.0.slot
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}
impl Eq for Var {}

/// Backing data for a module-level [`Global`](Expr::Global).
#[derive(Debug)]
pub struct GlobalData {
    pub name: String,
    pub ty: Type,
    pub initializer: Expr,
}

/// A shared handle to a global declaration; compared by name, as [`Var`] is.
#[derive(Debug, Clone)]
pub struct Global(pub Rc<GlobalData>);

impl Global {
    pub fn new(name: impl Into<String>, ty: Type, initializer: Expr) -> Self {
        Global(Rc::new(GlobalData {
            name: name.into(),
            ty,
            initializer,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn ty(&self) -> Type {
        self.0.ty
    }
}

impl PartialEq for Global {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}
impl Eq for Global {}

/// Backing data for a [`FunctionDef`].
#[derive(Debug)]
pub struct FunctionDefData {
    pub name: String,
    pub args: Vec<Var>,
    pub locals: Vec<Var>,
    pub body: Vec<Stmt>,
    pub return_type: Type,
}

/// A shared handle to a function definition; compared by name. Call sites
/// hold a clone of the same `Rc` the top-level program owns, so resolving a
/// call is a name lookup followed by a cheap clone, not a re-borrow of the
/// whole function body.
#[derive(Debug, Clone)]
pub struct FunctionDef(pub Rc<FunctionDefData>);

impl FunctionDef {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn return_type(&self) -> Type {
        self.0.return_type
    }

    pub fn arg_count(&self) -> usize {
        self.0.args.len()
    }
}

impl PartialEq for FunctionDef {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}
impl Eq for FunctionDef {}

/// Binary arithmetic operators. Semantics are modulo 2^32 (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

/// Unary operators. `Not` has no native opcode and is synthesized as
/// `operand != 0 ? 0 : 1` (spec.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOpKind {
    Plus,
    Neg,
    BitNot,
    Not,
}

/// A value-producing IR node. Every node carries (or can report) a [`Type`];
/// `void` is never constructed here, since `void` is illegal in expression
/// context (spec.md §3) — the one place a `void` call can appear is as a
/// statement, represented directly as `Stmt::Expr`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    UIntLiteral(u32),
    /// An array literal's element values, e.g. from a string or bracketed
    /// list. `id` disambiguates otherwise-identical literals for the static
    /// allocator's upsert table (spec.md §4.3): two `[1, 2]` literals at
    /// different source positions are different allocations.
    ArrayLiteral { id: usize, bytes: Rc<Vec<u32>> },
    Argument(Var),
    Local(Var),
    Global(Global),
    BinOp {
        op: BinOpKind,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    UnOp {
        op: UnOpKind,
        operand: Box<Expr>,
    },
    Subscript {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        function: FunctionDef,
        args: Vec<Expr>,
    },
    BuiltinCall {
        builtin: crate::builtins::Builtin,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// The static type this expression evaluates to.
    pub fn ty(&self) -> Type {
        match self {
            Expr::UIntLiteral(_) => Type::Uint,
            Expr::ArrayLiteral { .. } => Type::Array,
            Expr::Argument(v) | Expr::Local(v) => v.ty(),
            Expr::Global(g) => g.ty(),
            Expr::BinOp { .. } => Type::Uint,
            Expr::UnOp { .. } => Type::Uint,
            Expr::Subscript { .. } => Type::Uint,
            Expr::Call { function, .. } => function.return_type(),
            Expr::BuiltinCall { builtin, .. } => builtin.return_type(),
        }
    }
}

/// A statement-level IR node: produces side effects, no value.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assignment {
        lhs: AssignTarget,
        rhs: Expr,
    },
    If {
        test: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    For {
        target: Var,
        iterator: Expr,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
    /// An expression evaluated for its side effects only — the sole
    /// position a `void`-typed call may appear in.
    Expr(Expr),
}

/// The legal left-hand side of an [`Stmt::Assignment`]: a local, an
/// argument, or an indexed array slot (spec.md §3: `lhs ∈ {Local, Argument,
/// Subscript}`).
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Var(Var),
    Subscript { array: Expr, index: Expr },
}
