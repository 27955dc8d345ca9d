use super::*;
use crate::builtins::Builtin;
use crate::ir::{FunctionDefData, VarKind};
use std::rc::Rc;

fn main_with_body(body: Vec<Stmt>) -> FunctionDef {
    FunctionDef(Rc::new(FunctionDefData {
        name: "main".to_string(),
        args: vec![],
        locals: vec![],
        body,
        return_type: Type::Uint,
    }))
}

#[test]
fn empty_main_writes_zero_and_halts() {
    let mut allocator = StaticAllocator::new();
    let main = main_with_body(vec![Stmt::Return(Some(Expr::UIntLiteral(0)))]);
    let instructions = compile_function(main, &mut allocator).unwrap();
    assert_eq!(*instructions.last().unwrap(), Instruction::Halt);
    assert!(instructions
        .iter()
        .any(|i| matches!(i, Instruction::ArrayAmmendment { a: Register::Stack, .. })));
}

#[test]
fn putchar_hello_emits_two_outputs() {
    let mut allocator = StaticAllocator::new();
    let body = vec![
        Stmt::Expr(Expr::BuiltinCall {
            builtin: Builtin::Putchar,
            args: vec![Expr::UIntLiteral(72)],
        }),
        Stmt::Expr(Expr::BuiltinCall {
            builtin: Builtin::Putchar,
            args: vec![Expr::UIntLiteral(105)],
        }),
        Stmt::Return(Some(Expr::UIntLiteral(0))),
    ];
    let main = main_with_body(body);
    let instructions = compile_function(main, &mut allocator).unwrap();
    let outputs = instructions.iter().filter(|i| matches!(i, Instruction::Output { .. })).count();
    assert_eq!(outputs, 2);
}

#[test]
fn subtraction_uses_not_and_then_addition() {
    let mut allocator = StaticAllocator::new();
    let expr = Expr::BinOp {
        op: BinOpKind::Sub,
        lhs: Box::new(Expr::UIntLiteral(8)),
        rhs: Box::new(Expr::UIntLiteral(1)),
    };
    let main = main_with_body(vec![Stmt::Return(Some(expr))]);
    let instructions = compile_function(main, &mut allocator).unwrap();
    assert!(instructions.iter().any(|i| matches!(i, Instruction::NotAnd { .. })));
    assert!(instructions.iter().any(|i| matches!(i, Instruction::Addition { .. })));
}

#[test]
fn non_main_function_ends_with_load_program_not_halt() {
    let mut allocator = StaticAllocator::new();
    let n = Var::new("n", Type::Uint, VarKind::Argument, 0);
    let inc = FunctionDef(Rc::new(FunctionDefData {
        name: "inc".to_string(),
        args: vec![n.clone()],
        locals: vec![],
        body: vec![Stmt::Return(Some(Expr::BinOp {
            op: BinOpKind::Add,
            lhs: Box::new(Expr::Argument(n)),
            rhs: Box::new(Expr::UIntLiteral(1)),
        }))],
        return_type: Type::Uint,
    }));
    let instructions = compile_function(inc, &mut allocator).unwrap();
    assert!(matches!(instructions.last().unwrap(), Instruction::LoadProgram { .. }));
}

#[test]
fn for_loop_compiles_to_a_resolved_backward_jump() {
    let mut allocator = StaticAllocator::new();
    let msg = crate::ir::Global::new(
        "msg",
        Type::Array,
        Expr::ArrayLiteral { id: 0, bytes: Rc::new(vec![111, 107]) },
    );
    let c = Var::new("c", Type::Uint, VarKind::Local, 0);
    let body = vec![
        Stmt::For {
            target: c.clone(),
            iterator: Expr::Global(msg),
            body: vec![Stmt::Expr(Expr::BuiltinCall {
                builtin: Builtin::Putchar,
                args: vec![Expr::Local(c)],
            })],
        },
        Stmt::Return(Some(Expr::UIntLiteral(0))),
    ];
    let main = FunctionDef(Rc::new(FunctionDefData {
        name: "main".to_string(),
        args: vec![],
        locals: vec![Var::new("c", Type::Uint, VarKind::Local, 0)],
        body,
        return_type: Type::Uint,
    }));
    let instructions = compile_function(main, &mut allocator).unwrap();
    assert!(instructions.iter().any(|i| matches!(i, Instruction::LoadProgram { .. })));
    assert_eq!(allocator.len(), 1); // only the `msg` global is statically allocated
}
