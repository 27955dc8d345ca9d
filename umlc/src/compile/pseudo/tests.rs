use super::*;
use crate::error::Location;
use crate::runtime_constants::ORTHOGRAPHY_MAX;

fn here() -> Location {
    Location::unknown("test.uml")
}

#[test]
fn small_immediate_is_a_single_orthography() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    immediate(&mut emitter, &pool, Register::Ax, 42, here()).unwrap();
    let instructions = emitter.finish().unwrap();
    assert_eq!(
        instructions,
        vec![Instruction::Orthography {
            register: Register::Ax,
            value: 42,
        }]
    );
}

#[test]
fn large_immediate_expands_into_chunks() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    let big = ORTHOGRAPHY_MAX + 100;
    immediate(&mut emitter, &pool, Register::Ax, big, here()).unwrap();
    let instructions = emitter.finish().unwrap();
    // Orthography(max) + [Orthography(acc,100), Addition] = 3 words
    assert_eq!(instructions.len(), 3);
    assert!(matches!(instructions[0], Instruction::Orthography { value, .. } if value == ORTHOGRAPHY_MAX));
    assert!(matches!(instructions[2], Instruction::Addition { .. }));
}

#[test]
fn sub_immediate_uses_twos_complement_addition() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    sub_immediate(&mut emitter, &pool, Register::Ax, 1, Register::Bx, here()).unwrap();
    let instructions = emitter.finish().unwrap();
    assert_eq!(
        instructions[0],
        Instruction::Orthography {
            register: Register::Bx,
            value: u32::MAX,
        }
    );
    assert_eq!(
        instructions[1],
        Instruction::Addition {
            a: Register::Ax,
            b: Register::Ax,
            c: Register::Bx,
        }
    );
}

#[test]
fn push_then_pop_round_trips_through_the_stack() {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    push(&mut emitter, &pool, Register::Cx, Register::Dx, here()).unwrap();
    pop(&mut emitter, &pool, Register::Ax, Register::Dx, here()).unwrap();
    let instructions = emitter.finish().unwrap();
    assert!(matches!(
        instructions[0],
        Instruction::ArrayAmmendment {
            a: Register::Stack,
            b: Register::StackTop,
            c: Register::Cx,
        }
    ));
    assert!(matches!(
        instructions.last().unwrap(),
        Instruction::ArrayIndex {
            a: Register::Ax,
            b: Register::Stack,
            c: Register::StackTop,
        }
    ));
}

#[test]
fn registers_are_released_after_each_pseudo_op() {
    let pool = RegisterPool::new();
    let mut emitter = Emitter::new();
    immediate(&mut emitter, &pool, Register::Ax, ORTHOGRAPHY_MAX + 1, here()).unwrap();
    assert_eq!(pool.occupied_count(), 0);
}
