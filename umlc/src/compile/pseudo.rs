//! Pseudo-instruction expansion: the primitives every higher-level codegen
//! contract (assignment, loop, call) is built from (spec.md §4.7).

use crate::compile::emitter::Emitter;
use crate::compile::placeholder::{Label, PlaceholderInt};
use crate::compile::register_allocator::RegisterPool;
use crate::error::{Diagnostic, Location};
use crate::isa::Instruction;
use crate::runtime_constants::{Register, ORTHOGRAPHY_MAX};

/// Load a literal `u32` into `register`, expanding into repeated
/// `Orthography`+`Addition` chunks if it doesn't fit the 25-bit immediate
/// field (spec.md §4.7 "Large immediates"). Occupies its own scratch
/// register for the accumulator when chunking is needed.
pub fn immediate(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    register: Register,
    value: u32,
    site: Location,
) -> Result<(), Diagnostic> {
    if value <= ORTHOGRAPHY_MAX {
        emitter.emit(Instruction::Orthography { register, value });
        return Ok(());
    }

    let acc = pool.occupy(site)?;
    let acc_reg = acc.register();

    emitter.emit(Instruction::Orthography {
        register,
        value: ORTHOGRAPHY_MAX,
    });
    let mut remaining = value - ORTHOGRAPHY_MAX;
    while remaining > ORTHOGRAPHY_MAX {
        emitter.emit(Instruction::Orthography {
            register: acc_reg,
            value: ORTHOGRAPHY_MAX,
        });
        emitter.emit(Instruction::Addition {
            a: register,
            b: register,
            c: acc_reg,
        });
        remaining -= ORTHOGRAPHY_MAX;
    }
    if remaining > 0 {
        emitter.emit(Instruction::Orthography {
            register: acc_reg,
            value: remaining,
        });
        emitter.emit(Instruction::Addition {
            a: register,
            b: register,
            c: acc_reg,
        });
    }
    Ok(())
}

/// Load an instruction-pointer placeholder into `register`. Jump targets
/// always fit a single 25-bit Orthography (no program this compiler emits
/// reaches 2^25 words), so no chunking path is needed here.
pub fn immediate_placeholder(emitter: &mut Emitter, register: Register, value: PlaceholderInt) {
    emitter.emit_orthography_placeholder(register, value);
}

pub fn add_immediate(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    register: Register,
    literal: u32,
    acc: Register,
    site: Location,
) -> Result<(), Diagnostic> {
    immediate(emitter, pool, acc, literal, site)?;
    emitter.emit(Instruction::Addition {
        a: register,
        b: register,
        c: acc,
    });
    Ok(())
}

/// `a - b ≡ a + (~b + 1) mod 2^32` (spec.md §4.5, §9). `u32` arithmetic
/// already wraps modulo 2^32, so the two's-complement negation is just
/// `!literal + 1`.
pub fn sub_immediate(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    register: Register,
    literal: u32,
    acc: Register,
    site: Location,
) -> Result<(), Diagnostic> {
    let negated = (!literal).wrapping_add(1);
    immediate(emitter, pool, acc, negated, site)?;
    emitter.emit(Instruction::Addition {
        a: register,
        b: register,
        c: acc,
    });
    Ok(())
}

pub fn multiply_immediate(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    register: Register,
    literal: u32,
    acc: Register,
    site: Location,
) -> Result<(), Diagnostic> {
    immediate(emitter, pool, acc, literal, site)?;
    emitter.emit(Instruction::Multiplication {
        a: register,
        b: register,
        c: acc,
    });
    Ok(())
}

/// Push `register` onto the software call stack: `STACK[STACK_TOP] ←
/// register`, then `STACK_TOP += 1` (spec.md §4.6).
pub fn push(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    register: Register,
    acc: Register,
    site: Location,
) -> Result<(), Diagnostic> {
    emitter.emit(Instruction::ArrayAmmendment {
        a: Register::Stack,
        b: Register::StackTop,
        c: register,
    });
    add_immediate(emitter, pool, Register::StackTop, 1, acc, site)
}

/// Pop the top of the software call stack into `register`: `STACK_TOP -= 1`
/// (via adding `2^32-1`), then `register ← STACK[STACK_TOP]`.
pub fn pop(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    register: Register,
    acc: Register,
    site: Location,
) -> Result<(), Diagnostic> {
    sub_immediate(emitter, pool, Register::StackTop, 1, acc, site)?;
    emitter.emit(Instruction::ArrayIndex {
        a: register,
        b: Register::Stack,
        c: Register::StackTop,
    });
    Ok(())
}

/// Read `PIC_TABLE[pic_index]` into `register`.
pub fn read_symbol(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    register: Register,
    pic_index: u32,
    site: Location,
) -> Result<(), Diagnostic> {
    let acc = pool.occupy(site.clone())?;
    let acc_reg = acc.register();
    immediate(emitter, pool, acc_reg, pic_index, site)?;
    emitter.emit(Instruction::ArrayIndex {
        a: register,
        b: Register::PicTable,
        c: acc_reg,
    });
    Ok(())
}

/// Unconditional `a ← b`, synthesized from `ConditionalMove` the way the UM
/// requires (there is no plain register-to-register move opcode): load `1`
/// into a throwaway "always true" register, then conditional-move with that
/// as the condition.
pub fn unconditional_move(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    dest: Register,
    src: Register,
    site: Location,
) -> Result<(), Diagnostic> {
    let always_true = pool.occupy(site)?;
    let cond_reg = always_true.register();
    emitter.emit(Instruction::Orthography {
        register: cond_reg,
        value: 1,
    });
    emitter.emit(Instruction::ConditionalMove {
        a: dest,
        b: src,
        c: cond_reg,
    });
    Ok(())
}

/// Unconditional jump to `target` within the current code array.
pub fn jump(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    target: PlaceholderInt,
    site: Location,
) -> Result<(), Diagnostic> {
    let program = pool.occupy(site.clone())?;
    let program_reg = program.register();
    immediate(emitter, pool, program_reg, 0, site)?;
    let scratch = pool.occupy(site)?;
    immediate_placeholder(emitter, scratch.register(), target);
    emitter.emit(Instruction::LoadProgram {
        program: program_reg,
        offset: scratch.register(),
    });
    Ok(())
}

/// Branch to `target` if `condition_register` is zero, otherwise fall
/// through to `fallthrough`. Used by `If` to skip the true branch when the
/// test is false (spec.md §4.5): `ConditionalMove` only moves on a *nonzero*
/// condition, so the default outcome is loaded as `target` and overwritten
/// with `fallthrough` when the test holds.
pub fn branch_unless(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    condition_register: Register,
    target: PlaceholderInt,
    fallthrough: PlaceholderInt,
    site: Location,
) -> Result<(), Diagnostic> {
    let dest = pool.occupy(site.clone())?;
    let dest_reg = dest.register();
    let candidate = pool.occupy(site.clone())?;
    let candidate_reg = candidate.register();
    let program = pool.occupy(site)?;
    let program_reg = program.register();

    immediate_placeholder(emitter, dest_reg, target);
    immediate_placeholder(emitter, candidate_reg, fallthrough);
    emitter.emit(Instruction::ConditionalMove {
        a: dest_reg,
        b: candidate_reg,
        c: condition_register,
    });
    emitter.emit(Instruction::Orthography {
        register: program_reg,
        value: 0,
    });
    emitter.emit(Instruction::LoadProgram {
        program: program_reg,
        offset: dest_reg,
    });
    Ok(())
}

#[cfg(test)]
mod tests;
