use super::*;
use crate::ir::{Expr, FunctionDefData, GlobalData, Type};
use std::rc::Rc;

fn function(name: &str) -> FunctionDef {
    FunctionDef(Rc::new(FunctionDefData {
        name: name.to_string(),
        args: vec![],
        locals: vec![],
        body: vec![],
        return_type: Type::Uint,
    }))
}

fn global(name: &str) -> Global {
    Global(Rc::new(GlobalData {
        name: name.to_string(),
        ty: Type::Array,
        initializer: Expr::ArrayLiteral {
            id: 0,
            bytes: Rc::new(vec![]),
        },
    }))
}

#[test]
fn indices_increase_monotonically() {
    let mut allocator = StaticAllocator::new();
    let main = function("main");
    let msg = global("msg");
    assert_eq!(allocator.static_address(AllocKey::Global(msg.clone())), 0);
    assert_eq!(allocator.static_address(AllocKey::Function(main.clone())), 1);
    assert_eq!(allocator.len(), 2);
}

#[test]
fn repeated_lookups_of_the_same_node_return_the_same_index() {
    let mut allocator = StaticAllocator::new();
    let main = function("main");
    let first = allocator.static_address(AllocKey::Function(main.clone()));
    let second = allocator.static_address(AllocKey::Function(main));
    assert_eq!(first, second);
    assert_eq!(allocator.len(), 1);
}

#[test]
fn array_literals_are_keyed_by_node_id_not_content() {
    let mut allocator = StaticAllocator::new();
    let first = allocator.static_address(AllocKey::ArrayLiteral(0));
    let second = allocator.static_address(AllocKey::ArrayLiteral(1));
    assert_ne!(first, second);
}
