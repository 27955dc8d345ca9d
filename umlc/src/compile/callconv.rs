//! The synthesized call/return protocol over the software call stack
//! (spec.md §4.6). The UM has no native call instruction; `begin_call`,
//! `push_argument`, `finish_call`, `emit_prologue`, and `emit_epilogue`
//! together implement the convention the codegen driver's `Call`/`Return`
//! handling is built on. Splitting the caller side into three steps lets the
//! codegen driver push each argument as soon as it's evaluated instead of
//! holding every argument's register live for the whole call.
//!
//! The resume IP a call pushes is resolved with the ordinary `Label`
//! mechanism (mark it once the call's own `LoadProgram` has been emitted)
//! rather than the fixed-size-epilogue offset spec.md describes — see
//! DESIGN.md. Both compute the same value; the label removes the need to
//! keep a hand-verified constant in sync with the emitter.

use crate::compile::emitter::Emitter;
use crate::compile::placeholder::{Label, PlaceholderInt};
use crate::compile::pseudo::{immediate, immediate_placeholder, pop, push, read_symbol, unconditional_move};
use crate::compile::register_allocator::RegisterPool;
use crate::error::{Diagnostic, Location};
use crate::isa::Instruction;
use crate::runtime_constants::Register;

fn push_immediate(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    value: u32,
    site: Location,
) -> Result<(), Diagnostic> {
    let carrier = pool.occupy(site.clone())?;
    immediate(emitter, pool, carrier.register(), value, site.clone())?;
    let acc = pool.occupy(site.clone())?;
    push(emitter, pool, carrier.register(), acc.register(), site)
}

fn push_placeholder(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    value: PlaceholderInt,
    site: Location,
) -> Result<(), Diagnostic> {
    let carrier = pool.occupy(site.clone())?;
    immediate_placeholder(emitter, carrier.register(), value);
    let acc = pool.occupy(site.clone())?;
    push(emitter, pool, carrier.register(), acc.register(), site)
}

/// Begin the caller side of a call: save the caller's `LOCALS` and its own
/// PIC index so [`emit_epilogue`] can restore them on return. Split from
/// argument pushing and the actual jump (see [`push_argument`],
/// [`finish_call`]) so a caller with several arguments never has to hold
/// more than one argument's register live at a time — pushing one argument
/// fully releases its register before the next is evaluated.
pub fn begin_call(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    caller_pic_index: u32,
    site: Location,
) -> Result<(), Diagnostic> {
    {
        let acc = pool.occupy(site.clone())?;
        push(emitter, pool, Register::Locals, acc.register(), site.clone())?;
    }
    push_immediate(emitter, pool, caller_pic_index, site)
}

/// Push one already-evaluated argument onto the call stack. Arguments are
/// pushed in declared-parameter order; [`emit_prologue`] unpacks them in the
/// reverse order to match the stack's LIFO discipline.
pub fn push_argument(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    value: Register,
    site: Location,
) -> Result<(), Diagnostic> {
    let acc = pool.occupy(site.clone())?;
    push(emitter, pool, value, acc.register(), site)
}

/// Finish a call begun with [`begin_call`]: look up the callee's code array,
/// push the resume instruction pointer, and transfer control. Leaves the
/// return value readable from `STACK[0]` via [`read_return_value`] once the
/// callee returns.
pub fn finish_call(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    callee_pic_index: u32,
    site: Location,
) -> Result<(), Diagnostic> {
    let callee_array = pool.occupy(site.clone())?;
    read_symbol(emitter, pool, callee_array.register(), callee_pic_index, site.clone())?;

    let resume = Label::new();
    push_placeholder(emitter, pool, PlaceholderInt::label(resume.clone()), site.clone())?;

    let entry = pool.occupy(site.clone())?;
    immediate(emitter, pool, entry.register(), 0, site)?;
    emitter.emit(Instruction::LoadProgram {
        program: callee_array.register(),
        offset: entry.register(),
    });
    emitter.mark_label(&resume);
    Ok(())
}

/// Read the current function's return value out of `STACK[0]` into `dest`.
pub fn read_return_value(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    dest: Register,
    site: Location,
) -> Result<(), Diagnostic> {
    let index = pool.occupy(site.clone())?;
    immediate(emitter, pool, index.register(), 0, site)?;
    emitter.emit(Instruction::ArrayIndex {
        a: dest,
        b: Register::Stack,
        c: index.register(),
    });
    Ok(())
}

/// Write `value` into `STACK[0]` as this function's return value
/// (spec.md §4.6 "Return values").
pub fn write_return_value(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    value: Register,
    site: Location,
) -> Result<(), Diagnostic> {
    let index = pool.occupy(site.clone())?;
    immediate(emitter, pool, index.register(), 0, site)?;
    emitter.emit(Instruction::ArrayAmmendment {
        a: Register::Stack,
        b: index.register(),
        c: value,
    });
    Ok(())
}

/// Callee prologue: allocate this function's LOCALS array and, if it takes
/// arguments, unpack them off the stack into the low slots (spec.md §4.6
/// "Callee prologue"). Arguments were pushed by the caller in declared
/// order (`push_argument` per arg, left to right), so the last argument is
/// nearest the top of the stack; slots are filled highest-index first to
/// match.
pub fn emit_prologue(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    arg_count: usize,
    local_count: usize,
    site: Location,
) -> Result<(), Diagnostic> {
    {
        let size = pool.occupy(site.clone())?;
        immediate(
            emitter,
            pool,
            size.register(),
            (arg_count + local_count) as u32,
            site.clone(),
        )?;
        emitter.emit(Instruction::Allocation {
            result: Register::Locals,
            size: size.register(),
        });
    }

    if arg_count > 0 {
        let resume = pool.occupy(site.clone())?;
        {
            let acc = pool.occupy(site.clone())?;
            pop(emitter, pool, resume.register(), acc.register(), site.clone())?;
        }
        for slot in (0..arg_count).rev() {
            let value = pool.occupy(site.clone())?;
            {
                let acc = pool.occupy(site.clone())?;
                pop(emitter, pool, value.register(), acc.register(), site.clone())?;
            }
            let index = pool.occupy(site.clone())?;
            immediate(emitter, pool, index.register(), slot as u32, site.clone())?;
            emitter.emit(Instruction::ArrayAmmendment {
                a: Register::Locals,
                b: index.register(),
                c: value.register(),
            });
        }
        let acc = pool.occupy(site.clone())?;
        push(emitter, pool, resume.register(), acc.register(), site)?;
    }
    Ok(())
}

/// Callee epilogue: abandon this function's LOCALS and either halt (`main`)
/// or unwind the stack back to the caller's frame and resume it (spec.md
/// §4.6 "Callee epilogue").
pub fn emit_epilogue(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    is_main: bool,
    site: Location,
) -> Result<(), Diagnostic> {
    emitter.emit(Instruction::Abandonment {
        register: Register::Locals,
    });

    if is_main {
        emitter.emit(Instruction::Halt);
        return Ok(());
    }

    let resume = pool.occupy(site.clone())?;
    {
        let acc = pool.occupy(site.clone())?;
        pop(emitter, pool, resume.register(), acc.register(), site.clone())?;
    }

    let caller_program = pool.occupy(site.clone())?;
    {
        let caller_pic_index = pool.occupy(site.clone())?;
        {
            let acc = pool.occupy(site.clone())?;
            pop(emitter, pool, caller_pic_index.register(), acc.register(), site.clone())?;
        }
        emitter.emit(Instruction::ArrayIndex {
            a: caller_program.register(),
            b: Register::PicTable,
            c: caller_pic_index.register(),
        });
    }

    {
        let caller_locals = pool.occupy(site.clone())?;
        {
            let acc = pool.occupy(site.clone())?;
            pop(emitter, pool, caller_locals.register(), acc.register(), site.clone())?;
        }
        unconditional_move(emitter, pool, Register::Locals, caller_locals.register(), site)?;
    }

    emitter.emit(Instruction::LoadProgram {
        program: caller_program.register(),
        offset: resume.register(),
    });
    Ok(())
}

#[cfg(test)]
mod tests;
