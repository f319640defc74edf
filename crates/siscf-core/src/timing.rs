use crate::isa::InstructionKind;

/// Clocks spent latching an opcode into IR.
pub const FETCH_CYCLES: u8 = 1;

/// Bus protocol shapes that share an execute-cycle count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolShape {
    /// Commits on the first execute cycle (`HALT`, `NOP`, flag ops, `INC`/`DEC`).
    SingleCycle,
    /// Reads one operand word as the value.
    Immediate,
    /// Reads one operand word as an address, then the addressed word.
    Absolute,
    /// Writes a register to the operand address.
    Store,
    /// Unconditional jump.
    Jump,
    /// Conditional branch whose condition held.
    BranchTaken,
    /// Conditional branch whose condition failed.
    BranchNotTaken,
    /// Pushes a register.
    PushRegister,
    /// Pushes the word at the operand address.
    PushAbsolute,
    /// Pops into a register.
    PopRegister,
    /// Pops into the operand address.
    PopAbsolute,
    /// Subroutine call.
    Call,
    /// Subroutine return.
    Return,
    /// Register/memory move.
    Move,
}

/// Execute cycles per shape with a bus that never stalls.
pub const EXECUTE_CYCLE_TABLE: &[(ProtocolShape, u8)] = &[
    (ProtocolShape::SingleCycle, 1),
    (ProtocolShape::Immediate, 2),
    (ProtocolShape::Absolute, 3),
    (ProtocolShape::Store, 3),
    (ProtocolShape::Jump, 2),
    (ProtocolShape::BranchTaken, 2),
    (ProtocolShape::BranchNotTaken, 1),
    (ProtocolShape::PushRegister, 2),
    (ProtocolShape::PushAbsolute, 4),
    (ProtocolShape::PopRegister, 2),
    (ProtocolShape::PopAbsolute, 4),
    (ProtocolShape::Call, 3),
    (ProtocolShape::Return, 2),
    (ProtocolShape::Move, 6),
];

/// Shape `kind` follows; `branch_taken` only matters for conditional branches.
#[must_use]
pub const fn protocol_shape(kind: InstructionKind, branch_taken: bool) -> ProtocolShape {
    match kind {
        InstructionKind::Halt
        | InstructionKind::Nop
        | InstructionKind::SetFlag(_)
        | InstructionKind::ClearFlag(_)
        | InstructionKind::AluUnary { .. } => ProtocolShape::SingleCycle,
        InstructionKind::LoadImmediate(_) | InstructionKind::AluImmediate { .. } => {
            ProtocolShape::Immediate
        }
        InstructionKind::LoadAbsolute(_) | InstructionKind::AluAbsolute { .. } => {
            ProtocolShape::Absolute
        }
        InstructionKind::Store(_) => ProtocolShape::Store,
        InstructionKind::Jump => ProtocolShape::Jump,
        InstructionKind::Branch { .. } if branch_taken => ProtocolShape::BranchTaken,
        InstructionKind::Branch { .. } => ProtocolShape::BranchNotTaken,
        InstructionKind::PushRegister(_) => ProtocolShape::PushRegister,
        InstructionKind::PushAbsolute => ProtocolShape::PushAbsolute,
        InstructionKind::PopRegister(_) => ProtocolShape::PopRegister,
        InstructionKind::PopAbsolute => ProtocolShape::PopAbsolute,
        InstructionKind::Call => ProtocolShape::Call,
        InstructionKind::Return => ProtocolShape::Return,
        InstructionKind::Move => ProtocolShape::Move,
    }
}

/// Looks up the execute-cycle count for a shape.
#[must_use]
pub fn execute_cycles(shape: ProtocolShape) -> Option<u8> {
    EXECUTE_CYCLE_TABLE
        .iter()
        .find_map(|(entry, cycles)| (*entry == shape).then_some(*cycles))
}

/// Fetch plus execute clocks for `kind`, with a bus that never stalls.
#[must_use]
pub fn instruction_cycles(kind: InstructionKind, branch_taken: bool) -> Option<u8> {
    execute_cycles(protocol_shape(kind, branch_taken)).map(|cycles| cycles + FETCH_CYCLES)
}
