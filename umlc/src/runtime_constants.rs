//! Fixed UM machine constants: register assignments and array sizes.
//!
//! Mirrors `runtime_constants.py` from the original compiler revision —
//! register numbering is load-bearing (it is baked into every emitted
//! instruction word), so it is reproduced verbatim.

/// The UM's eight registers.
///
/// `AX`..`DX` are the scratch pool the register allocator hands out;
/// the rest are fixed roles never touched by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Ax = 0,
    Bx = 1,
    Cx = 2,
    Dx = 3,
    Locals = 4,
    PicTable = 5,
    Stack = 6,
    StackTop = 7,
}

impl Register {
    pub const fn index(self) -> u32 {
        self as u32
    }
}

impl From<Register> for u32 {
    fn from(r: Register) -> u32 {
        r.index()
    }
}

impl Register {
    /// Decode a 3-bit register field back into a [`Register`]; `None` if the
    /// value isn't one of the eight register numbers.
    pub fn from_index(value: u32) -> Option<Register> {
        match value {
            0 => Some(Register::Ax),
            1 => Some(Register::Bx),
            2 => Some(Register::Cx),
            3 => Some(Register::Dx),
            4 => Some(Register::Locals),
            5 => Some(Register::PicTable),
            6 => Some(Register::Stack),
            7 => Some(Register::StackTop),
            _ => None,
        }
    }
}

/// Size, in words, of the software call stack array.
pub const STACK_SIZE: u32 = 1024;

/// Largest value an Orthography (load-immediate) instruction can carry.
pub const ORTHOGRAPHY_MAX: u32 = (1 << 25) - 1;
