use super::*;

#[test]
fn vars_with_the_same_name_compare_equal() {
    let a = Var::new("x", Type::Uint, VarKind::Local, 0);
    let b = Var::new("x", Type::Uint, VarKind::Local, 0);
    assert_eq!(a, b);
}

#[test]
fn vars_with_different_names_compare_unequal() {
    let a = Var::new("x", Type::Uint, VarKind::Local, 0);
    let b = Var::new("y", Type::Uint, VarKind::Local, 1);
    assert_ne!(a, b);
}

#[test]
fn expr_ty_follows_the_node_kind() {
    let literal = Expr::UIntLiteral(5);
    assert_eq!(literal.ty(), Type::Uint);

    let array = Expr::ArrayLiteral {
        id: 0,
        bytes: std::rc::Rc::new(vec![1, 2, 3]),
    };
    assert_eq!(array.ty(), Type::Array);
}

#[test]
fn function_def_identity_is_by_name() {
    let data = FunctionDefData {
        name: "f".to_string(),
        args: vec![],
        locals: vec![],
        body: vec![],
        return_type: Type::Uint,
    };
    let shared = std::rc::Rc::new(data);
    let a = FunctionDef(shared.clone());
    let b = FunctionDef(shared);
    assert_eq!(a, b);
}
