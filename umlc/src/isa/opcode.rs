/// The 14 native UM opcodes, numbered exactly as spec.md §4.7 enumerates
/// them (the numbering is load-bearing — it is encoded into every emitted
/// instruction word).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    ConditionalMove = 0,
    ArrayIndex = 1,
    ArrayAmmendment = 2,
    Addition = 3,
    Multiplication = 4,
    Division = 5,
    NotAnd = 6,
    Halt = 7,
    Allocation = 8,
    Abandonment = 9,
    Output = 10,
    Input = 11,
    LoadProgram = 12,
    Orthography = 13,
}

impl Opcode {
    pub const fn number(self) -> u32 {
        self as u32
    }

    pub fn from_number(value: u32) -> Option<Opcode> {
        Some(match value {
            0 => Opcode::ConditionalMove,
            1 => Opcode::ArrayIndex,
            2 => Opcode::ArrayAmmendment,
            3 => Opcode::Addition,
            4 => Opcode::Multiplication,
            5 => Opcode::Division,
            6 => Opcode::NotAnd,
            7 => Opcode::Halt,
            8 => Opcode::Allocation,
            9 => Opcode::Abandonment,
            10 => Opcode::Output,
            11 => Opcode::Input,
            12 => Opcode::LoadProgram,
            13 => Opcode::Orthography,
            _ => return None,
        })
    }
}
