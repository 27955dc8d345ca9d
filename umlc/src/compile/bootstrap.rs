//! The bootstrap preamble (spec.md §6 "Output format"): allocates the PIC
//! table and call stack, materializes every static allocation in index
//! order, and transfers control to `main`.

use crate::compile::emitter::Emitter;
use crate::compile::pseudo::{immediate, read_symbol};
use crate::compile::register_allocator::RegisterPool;
use crate::error::{Diagnostic, Location};
use crate::isa::Instruction;
use crate::runtime_constants::{Register, STACK_SIZE};

/// The materialized contents of one static allocation (spec.md §4.3),
/// resolved and ready to be written into its fresh UM array at bootstrap
/// time. Indices into the slice passed to [`emit_bootstrap`] must line up
/// exactly with the static allocator's assignment.
pub enum AllocContent {
    /// A function body's already-assembled native instructions.
    Code(Vec<Instruction>),
    /// An array global's or array literal's element values; slot 0 of the
    /// materialized array holds the element count, per the `array` type's
    /// runtime representation (spec.md §3).
    Data(Vec<u32>),
}

fn bootstrap_site() -> Location {
    Location::unknown("<bootstrap>")
}

/// Emit the bootstrap preamble for a fully-compiled module.
pub fn emit_bootstrap(allocations: &[AllocContent], main_pic_index: u32) -> Result<Vec<Instruction>, Diagnostic> {
    let mut emitter = Emitter::new();
    let pool = RegisterPool::new();
    let site = bootstrap_site();

    {
        let size = pool.occupy(site.clone())?;
        immediate(&mut emitter, &pool, size.register(), allocations.len() as u32, site.clone())?;
        emitter.emit(Instruction::Allocation {
            result: Register::PicTable,
            size: size.register(),
        });
    }
    {
        let size = pool.occupy(site.clone())?;
        immediate(&mut emitter, &pool, size.register(), STACK_SIZE, site.clone())?;
        emitter.emit(Instruction::Allocation {
            result: Register::Stack,
            size: size.register(),
        });
    }
    immediate(&mut emitter, &pool, Register::StackTop, 1, site.clone())?;

    for (index, allocation) in allocations.iter().enumerate() {
        materialize(&mut emitter, &pool, index as u32, allocation, site.clone())?;
    }

    {
        let program = pool.occupy(site.clone())?;
        read_symbol(&mut emitter, &pool, program.register(), main_pic_index, site.clone())?;
        let offset = pool.occupy(site.clone())?;
        immediate(&mut emitter, &pool, offset.register(), 0, site)?;
        emitter.emit(Instruction::LoadProgram {
            program: program.register(),
            offset: offset.register(),
        });
    }

    emitter.finish()
}

fn materialize(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    index: u32,
    allocation: &AllocContent,
    site: Location,
) -> Result<(), Diagnostic> {
    let words = match allocation {
        AllocContent::Code(code) => code.len() as u32,
        AllocContent::Data(bytes) => bytes.len() as u32 + 1,
    };

    let handle = pool.occupy(site.clone())?;
    {
        let size = pool.occupy(site.clone())?;
        immediate(emitter, pool, size.register(), words, site.clone())?;
        emitter.emit(Instruction::Allocation {
            result: handle.register(),
            size: size.register(),
        });
    }

    match allocation {
        AllocContent::Code(code) => {
            for (offset, instr) in code.iter().enumerate() {
                amend_word(emitter, pool, handle.register(), offset as u32, instr.encode(), site.clone())?;
            }
        }
        AllocContent::Data(bytes) => {
            amend_word(emitter, pool, handle.register(), 0, bytes.len() as u32, site.clone())?;
            for (offset, value) in bytes.iter().enumerate() {
                amend_word(emitter, pool, handle.register(), offset as u32 + 1, *value, site.clone())?;
            }
        }
    }

    {
        let slot = pool.occupy(site.clone())?;
        immediate(emitter, pool, slot.register(), index, site.clone())?;
        emitter.emit(Instruction::ArrayAmmendment {
            a: Register::PicTable,
            b: slot.register(),
            c: handle.register(),
        });
    }
    Ok(())
}

fn amend_word(
    emitter: &mut Emitter,
    pool: &RegisterPool,
    array: Register,
    offset: u32,
    value: u32,
    site: Location,
) -> Result<(), Diagnostic> {
    let index = pool.occupy(site.clone())?;
    immediate(emitter, pool, index.register(), offset, site.clone())?;
    let val = pool.occupy(site.clone())?;
    immediate(emitter, pool, val.register(), value, site)?;
    emitter.emit(Instruction::ArrayAmmendment {
        a: array,
        b: index.register(),
        c: val.register(),
    });
    Ok(())
}
