//! Instruction-pointer tracking (spec.md §4.5 "Instruction-pointer
//! tracking").
//!
//! Flattens the original generator-based codegen pattern (spec.md §9) into a
//! stateful emitter: `emit` appends a native instruction and returns the IP
//! it landed at, so callers that need to compute a resume target (a call's
//! return address, a loop's back-edge) can read the IP without threading a
//! counter through every lowering function by hand.

use crate::compile::placeholder::{Label, PlaceholderInt};
use crate::compile::trace::{TraceCollector, TraceEvent};
use crate::error::Diagnostic;
use crate::isa::Instruction;
use crate::runtime_constants::Register;

enum PendingWord {
    Ready(Instruction),
    Orthography {
        register: Register,
        value: PlaceholderInt,
    },
}

/// Accumulates native instructions for one static allocation (a function
/// body, or the bootstrap), resolving any still-open jump-target
/// placeholders once the whole sequence has been emitted.
#[derive(Default)]
pub struct Emitter {
    words: Vec<PendingWord>,
}

impl Emitter {
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// The instruction pointer the *next* emitted word will land at.
    pub fn ip(&self) -> u32 {
        self.words.len() as u32
    }

    /// Emit a fully-resolved native instruction, returning the IP it was
    /// placed at.
    pub fn emit(&mut self, instr: Instruction) -> u32 {
        let ip = self.ip();
        self.words.push(PendingWord::Ready(instr));
        ip
    }

    /// Emit an `Orthography` whose value is a jump-target placeholder that
    /// may not be resolved yet.
    pub fn emit_orthography_placeholder(&mut self, register: Register, value: PlaceholderInt) -> u32 {
        let ip = self.ip();
        self.words.push(PendingWord::Orthography { register, value });
        ip
    }

    /// Mark `label` as resolving to the current instruction pointer — the
    /// usual way a codegen driver fixes up a forward jump once it reaches
    /// the jump's destination.
    pub fn mark_label(&self, label: &Label) {
        let ip = self.ip();
        label.resolve(ip);
        TraceCollector::emit(TraceEvent::JumpTargetResolved { ip });
    }

    /// Resolve every pending word into a concrete instruction. An
    /// unresolved placeholder at this point is a fatal internal error
    /// (spec.md §7).
    pub fn finish(self) -> Result<Vec<Instruction>, Diagnostic> {
        self.words
            .into_iter()
            .map(|word| match word {
                PendingWord::Ready(instr) => Ok(instr),
                PendingWord::Orthography { register, value } => {
                    let value = value.require()?;
                    Ok(Instruction::Orthography { register, value })
                }
            })
            .collect()
    }
}
