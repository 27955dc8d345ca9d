use super::parse;
use crate::cst::{ExprKind, Operator, StmtKind};
use pretty_assertions::assert_eq;

#[test]
fn parses_empty_main() {
    let module = parse("def main() -> uint:\n    return 0\n").unwrap();
    assert_eq!(module.body.len(), 1);
    let StmtKind::FunctionDef { name, body, returns, .. } = &module.body[0].kind else {
        panic!("expected a function def");
    };
    assert_eq!(name, "main");
    assert!(returns.is_some());
    assert_eq!(body.len(), 1);
    assert!(matches!(body[0].kind, StmtKind::Return { .. }));
}

#[test]
fn parses_global_string() {
    let module = parse("msg: array = \"ok\"\n").unwrap();
    let StmtKind::AnnAssign { value, .. } = &module.body[0].kind else {
        panic!("expected an annotated assignment");
    };
    assert!(matches!(value.kind, ExprKind::Str(ref s) if s == "ok"));
}

#[test]
fn parses_arithmetic_precedence() {
    let module = parse(
        "def main() -> uint:\n    x: uint = (5 + 3) * 2 - 1\n    return 0\n",
    )
    .unwrap();
    let StmtKind::FunctionDef { body, .. } = &module.body[0].kind else {
        panic!();
    };
    let StmtKind::AnnAssign { value, .. } = &body[0].kind else {
        panic!();
    };
    // top level op must be '-', since '*' binds tighter than '+'/'-'
    assert!(matches!(value.kind, ExprKind::BinOp { op: Operator::Sub, .. }));
}

#[test]
fn parses_builtin_call_as_dotted_name() {
    let module = parse("def main() -> uint:\n    um.putchar(72)\n    return 0\n").unwrap();
    let StmtKind::FunctionDef { body, .. } = &module.body[0].kind else {
        panic!();
    };
    let StmtKind::Expr { value } = &body[0].kind else {
        panic!("expected an expression statement");
    };
    let ExprKind::Call { func, args, .. } = &value.kind else {
        panic!("expected a call");
    };
    assert!(matches!(&func.kind, ExprKind::Name { id, .. } if id == "um.putchar"));
    assert_eq!(args.len(), 1);
}

#[test]
fn parses_for_and_if() {
    let src = "def main() -> uint:\n    for c in msg:\n        if c:\n            um.putchar(c)\n        else:\n            um.putchar(0)\n    return 0\n";
    let module = parse(src).unwrap();
    let StmtKind::FunctionDef { body, .. } = &module.body[0].kind else {
        panic!();
    };
    assert!(matches!(body[0].kind, StmtKind::For { .. }));
}

#[test]
fn parses_varargs_for_later_rejection() {
    let module = parse("def f(*args) -> void:\n    return\n").unwrap();
    let StmtKind::FunctionDef { args, .. } = &module.body[0].kind else {
        panic!();
    };
    assert!(args.vararg.is_some());
}

#[test]
fn rejects_bad_dedent() {
    let err = parse("def f() -> uint:\n    return 0\n  return 1\n");
    assert!(err.is_err());
}
