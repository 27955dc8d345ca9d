use super::*;
use crate::ir::Expr;

fn here() -> Location {
    Location::unknown("test.uml")
}

#[test]
fn redeclaring_a_global_is_rejected() {
    let mut scope = GlobalScope::new();
    scope.declare_global("x", Type::Uint, Expr::UIntLiteral(0), here()).unwrap();
    let err = scope.declare_global("x", Type::Uint, Expr::UIntLiteral(1), here());
    assert!(matches!(err, Err(Diagnostic::Name { .. })));
}

#[test]
fn a_function_cannot_shadow_a_global() {
    let mut scope = GlobalScope::new();
    scope.declare_global("x", Type::Uint, Expr::UIntLiteral(0), here()).unwrap();
    let err = scope.declare_function("x", vec![], Type::Void, here());
    assert!(err.is_err());
}

#[test]
fn array_ids_are_monotonic_and_unique() {
    let scope = GlobalScope::new();
    assert_eq!(scope.fresh_array_id(), 0);
    assert_eq!(scope.fresh_array_id(), 1);
}

#[test]
fn function_scope_seeds_arguments_and_assigns_slots_in_order() {
    let n = Var::new("n", Type::Uint, VarKind::Argument, 0);
    let scope = FunctionScope::new(vec![n.clone()]);
    assert_eq!(scope.resolve("n"), Some(n));
    assert_eq!(scope.resolve("missing"), None);
}

#[test]
fn declaring_a_local_with_an_argument_name_is_rejected() {
    let n = Var::new("n", Type::Uint, VarKind::Argument, 0);
    let mut scope = FunctionScope::new(vec![n]);
    let err = scope.declare_local("n", Type::Uint, here());
    assert!(err.is_err());
}

#[test]
fn locals_get_slots_after_every_argument() {
    let n = Var::new("n", Type::Uint, VarKind::Argument, 0);
    let mut scope = FunctionScope::new(vec![n]);
    let m = scope.declare_local("m", Type::Uint, here()).unwrap();
    assert_eq!(m.slot(), 1);
    assert_eq!(scope.into_locals().len(), 1);
}
