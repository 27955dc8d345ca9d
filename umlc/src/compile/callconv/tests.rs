use super::*;
use crate::error::Location;

fn here() -> Location {
    Location::unknown("test.uml")
}

#[test]
fn call_releases_every_register_once_emitted() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    begin_call(&mut emitter, &pool, 0, here()).unwrap();
    finish_call(&mut emitter, &pool, 1, here()).unwrap();
    assert_eq!(pool.occupied_count(), 0);
}

#[test]
fn pushing_each_argument_never_holds_more_than_one_register() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    begin_call(&mut emitter, &pool, 0, here()).unwrap();
    for register in [Register::Ax, Register::Bx] {
        push_argument(&mut emitter, &pool, register, here()).unwrap();
        assert_eq!(pool.occupied_count(), 0);
    }
    finish_call(&mut emitter, &pool, 1, here()).unwrap();
    assert_eq!(pool.occupied_count(), 0);
    let instructions = emitter.finish().unwrap();
    assert!(!instructions.is_empty());
}

#[test]
fn prologue_with_no_arguments_just_allocates_locals() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    emit_prologue(&mut emitter, &pool, 0, 2, here()).unwrap();
    let instructions = emitter.finish().unwrap();
    assert!(matches!(
        instructions.last().unwrap(),
        Instruction::Allocation {
            result: Register::Locals,
            ..
        }
    ));
    assert_eq!(pool.occupied_count(), 0);
}

#[test]
fn prologue_with_arguments_unpacks_them_and_restores_the_resume_ip() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    emit_prologue(&mut emitter, &pool, 2, 0, here()).unwrap();
    let instructions = emitter.finish().unwrap();
    let amendments = instructions
        .iter()
        .filter(|i| matches!(i, Instruction::ArrayAmmendment { a: Register::Locals, .. }))
        .count();
    assert_eq!(amendments, 2);
    assert_eq!(pool.occupied_count(), 0);
}

#[test]
fn main_epilogue_halts_without_touching_the_stack() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    emit_epilogue(&mut emitter, &pool, true, here()).unwrap();
    let instructions = emitter.finish().unwrap();
    assert_eq!(instructions[0], Instruction::Abandonment { register: Register::Locals });
    assert_eq!(*instructions.last().unwrap(), Instruction::Halt);
    assert_eq!(pool.occupied_count(), 0);
}

#[test]
fn non_main_epilogue_ends_in_a_load_program_back_to_the_caller() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    emit_epilogue(&mut emitter, &pool, false, here()).unwrap();
    let instructions = emitter.finish().unwrap();
    assert!(matches!(instructions.last().unwrap(), Instruction::LoadProgram { .. }));
    assert_eq!(pool.occupied_count(), 0);
}

#[test]
fn return_value_round_trips_through_stack_slot_zero() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    write_return_value(&mut emitter, &pool, Register::Ax, here()).unwrap();
    read_return_value(&mut emitter, &pool, Register::Bx, here()).unwrap();
    assert_eq!(pool.occupied_count(), 0);
    let instructions = emitter.finish().unwrap();
    assert!(instructions
        .iter()
        .any(|i| matches!(i, Instruction::ArrayAmmendment { a: Register::Stack, .. })));
    assert!(instructions
        .iter()
        .any(|i| matches!(i, Instruction::ArrayIndex { b: Register::Stack, .. })));
}
