//! The 14-opcode UM instruction set: native instruction encoding and
//! serialization (spec.md §4.7).

mod instruction;
mod opcode;

pub use instruction::Instruction;
pub use opcode::Opcode;

use crate::error::Diagnostic;

/// Serialize a sequence of native instructions into big-endian 32-bit words
/// (spec.md §6 "Output format").
pub fn serialize(instructions: &[Instruction]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(instructions.len() * 4);
    for instr in instructions {
        bytes.extend_from_slice(&instr.encode().to_be_bytes());
    }
    bytes
}

/// Parse a big-endian byte stream back into native instructions. Used by
/// tests to verify the round-trip property (spec.md §8).
pub fn deserialize(bytes: &[u8]) -> Result<Vec<Instruction>, Diagnostic> {
    if bytes.len() % 4 != 0 {
        return Err(Diagnostic::internal(format!(
            "byte stream length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    bytes
        .chunks_exact(4)
        .map(|chunk| {
            let word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            Instruction::decode(word)
        })
        .collect()
}
