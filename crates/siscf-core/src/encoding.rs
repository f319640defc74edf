//! Standard opcode assignments and instruction descriptors.

use crate::alu::AluOp;
use crate::execute::StepEffect;
use crate::isa::{InstructionKind, StepContext};
use crate::state::{Flag, GeneralRegister};

use GeneralRegister::{Ra, Rb, Rx};
use InstructionKind as K;

/// Name of the descriptor unknown opcodes fall back to.
pub const FALLBACK_INSTRUCTION: &str = "NOP";

/// Standard opcode values.
#[allow(missing_docs)]
pub mod opcode {
    pub const HALT: u32 = 0x00;
    pub const NOP: u32 = 0x01;
    pub const MOV: u32 = 0x02;
    pub const JMP: u32 = 0x10;
    pub const JIZ: u32 = 0x11;
    pub const JNZ: u32 = 0x12;
    pub const JIC: u32 = 0x13;
    pub const JNC: u32 = 0x14;
    pub const JIE: u32 = 0x15;
    pub const JNE: u32 = 0x16;
    pub const LDA_ABS: u32 = 0x20;
    pub const LDB_ABS: u32 = 0x21;
    pub const LDX_ABS: u32 = 0x22;
    pub const ADDA_ABS: u32 = 0x30;
    pub const ADDB_ABS: u32 = 0x31;
    pub const ADDX_ABS: u32 = 0x32;
    pub const SUBA_ABS: u32 = 0x33;
    pub const SUBB_ABS: u32 = 0x34;
    pub const SUBX_ABS: u32 = 0x35;
    pub const INCA: u32 = 0x36;
    pub const INCB: u32 = 0x37;
    pub const INCX: u32 = 0x38;
    pub const DECA: u32 = 0x39;
    pub const DECB: u32 = 0x3A;
    pub const DECX: u32 = 0x3B;
    pub const STA: u32 = 0x40;
    pub const STB: u32 = 0x41;
    pub const STX: u32 = 0x42;
    pub const PUSH: u32 = 0xA0;
    pub const PUSHA: u32 = 0xA1;
    pub const PUSHB: u32 = 0xA2;
    pub const PUSHX: u32 = 0xA3;
    pub const POP: u32 = 0xB0;
    pub const POPA: u32 = 0xB1;
    pub const POPB: u32 = 0xB2;
    pub const POPX: u32 = 0xB3;
    pub const CALL: u32 = 0xB4;
    pub const RET: u32 = 0xB5;
    pub const SUBA: u32 = 0xC0;
    pub const SUBB: u32 = 0xC1;
    pub const SUBX: u32 = 0xC2;
    pub const LDA: u32 = 0xD0;
    pub const LDB: u32 = 0xD1;
    pub const LDX: u32 = 0xD2;
    pub const ADDA: u32 = 0xE0;
    pub const ADDB: u32 = 0xE1;
    pub const ADDX: u32 = 0xE2;
    pub const SCF: u32 = 0xF0;
    pub const CCF: u32 = 0xF1;
    pub const SEF: u32 = 0xF2;
    pub const CEF: u32 = 0xF3;
}

/// Metadata plus behavior for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstructionDescriptor {
    /// Opcode matched against IR.
    pub opcode: u32,
    /// Unique mnemonic.
    pub name: &'static str,
    /// Declared length in words, opcode included. Advisory only.
    pub length: u8,
    /// Execution protocol.
    pub kind: InstructionKind,
}

impl InstructionDescriptor {
    /// Builds a descriptor.
    #[must_use]
    pub const fn new(opcode: u32, name: &'static str, length: u8, kind: InstructionKind) -> Self {
        Self {
            opcode,
            name,
            length,
            kind,
        }
    }

    /// Runs one execution cycle of this instruction.
    #[must_use]
    pub const fn step(&self, ctx: &StepContext<'_>) -> StepEffect {
        self.kind.step(ctx)
    }
}

const fn branch(flag: Flag, when_set: bool) -> InstructionKind {
    K::Branch { flag, when_set }
}

const fn alu_imm(op: AluOp, reg: GeneralRegister) -> InstructionKind {
    K::AluImmediate { op, reg }
}

const fn alu_abs(op: AluOp, reg: GeneralRegister) -> InstructionKind {
    K::AluAbsolute { op, reg }
}

const fn alu_unary(op: AluOp, reg: GeneralRegister) -> InstructionKind {
    K::AluUnary { op, reg }
}

/// Standard SISC-F instruction set in opcode order.
pub const STANDARD_INSTRUCTIONS: &[InstructionDescriptor] = &[
    InstructionDescriptor::new(opcode::HALT, "HALT", 1, K::Halt),
    InstructionDescriptor::new(opcode::NOP, "NOP", 1, K::Nop),
    InstructionDescriptor::new(opcode::MOV, "MOV", 3, K::Move),
    InstructionDescriptor::new(opcode::JMP, "JMP", 3, K::Jump),
    InstructionDescriptor::new(opcode::JIZ, "JIZ", 3, branch(Flag::Zero, true)),
    InstructionDescriptor::new(opcode::JNZ, "JNZ", 3, branch(Flag::Zero, false)),
    InstructionDescriptor::new(opcode::JIC, "JIC", 3, branch(Flag::Carry, true)),
    InstructionDescriptor::new(opcode::JNC, "JNC", 3, branch(Flag::Carry, false)),
    InstructionDescriptor::new(opcode::JIE, "JIE", 3, branch(Flag::Error, true)),
    InstructionDescriptor::new(opcode::JNE, "JNE", 3, branch(Flag::Error, false)),
    InstructionDescriptor::new(opcode::LDA_ABS, "LDA_ABS", 2, K::LoadAbsolute(Ra)),
    InstructionDescriptor::new(opcode::LDB_ABS, "LDB_ABS", 2, K::LoadAbsolute(Rb)),
    InstructionDescriptor::new(opcode::LDX_ABS, "LDX_ABS", 2, K::LoadAbsolute(Rx)),
    InstructionDescriptor::new(opcode::ADDA_ABS, "ADDA_ABS", 2, alu_abs(AluOp::Add, Ra)),
    InstructionDescriptor::new(opcode::ADDB_ABS, "ADDB_ABS", 2, alu_abs(AluOp::Add, Rb)),
    InstructionDescriptor::new(opcode::ADDX_ABS, "ADDX_ABS", 2, alu_abs(AluOp::Add, Rx)),
    InstructionDescriptor::new(opcode::SUBA_ABS, "SUBA_ABS", 2, alu_abs(AluOp::Sub, Ra)),
    InstructionDescriptor::new(opcode::SUBB_ABS, "SUBB_ABS", 2, alu_abs(AluOp::Sub, Rb)),
    InstructionDescriptor::new(opcode::SUBX_ABS, "SUBX_ABS", 2, alu_abs(AluOp::Sub, Rx)),
    InstructionDescriptor::new(opcode::INCA, "INCA", 1, alu_unary(AluOp::Inc, Ra)),
    InstructionDescriptor::new(opcode::INCB, "INCB", 1, alu_unary(AluOp::Inc, Rb)),
    InstructionDescriptor::new(opcode::INCX, "INCX", 1, alu_unary(AluOp::Inc, Rx)),
    InstructionDescriptor::new(opcode::DECA, "DECA", 1, alu_unary(AluOp::Dec, Ra)),
    InstructionDescriptor::new(opcode::DECB, "DECB", 1, alu_unary(AluOp::Dec, Rb)),
    InstructionDescriptor::new(opcode::DECX, "DECX", 1, alu_unary(AluOp::Dec, Rx)),
    InstructionDescriptor::new(opcode::STA, "STA", 2, K::Store(Ra)),
    InstructionDescriptor::new(opcode::STB, "STB", 2, K::Store(Rb)),
    InstructionDescriptor::new(opcode::STX, "STX", 2, K::Store(Rx)),
    InstructionDescriptor::new(opcode::PUSH, "PUSH", 2, K::PushAbsolute),
    InstructionDescriptor::new(opcode::PUSHA, "PUSHA", 1, K::PushRegister(Ra)),
    InstructionDescriptor::new(opcode::PUSHB, "PUSHB", 1, K::PushRegister(Rb)),
    InstructionDescriptor::new(opcode::PUSHX, "PUSHX", 1, K::PushRegister(Rx)),
    InstructionDescriptor::new(opcode::POP, "POP", 2, K::PopAbsolute),
    InstructionDescriptor::new(opcode::POPA, "POPA", 1, K::PopRegister(Ra)),
    InstructionDescriptor::new(opcode::POPB, "POPB", 1, K::PopRegister(Rb)),
    InstructionDescriptor::new(opcode::POPX, "POPX", 1, K::PopRegister(Rx)),
    InstructionDescriptor::new(opcode::CALL, "CALL", 2, K::Call),
    InstructionDescriptor::new(opcode::RET, "RET", 1, K::Return),
    InstructionDescriptor::new(opcode::SUBA, "SUBA", 2, alu_imm(AluOp::Sub, Ra)),
    InstructionDescriptor::new(opcode::SUBB, "SUBB", 2, alu_imm(AluOp::Sub, Rb)),
    InstructionDescriptor::new(opcode::SUBX, "SUBX", 2, alu_imm(AluOp::Sub, Rx)),
    InstructionDescriptor::new(opcode::LDA, "LDA", 2, K::LoadImmediate(Ra)),
    InstructionDescriptor::new(opcode::LDB, "LDB", 2, K::LoadImmediate(Rb)),
    InstructionDescriptor::new(opcode::LDX, "LDX", 2, K::LoadImmediate(Rx)),
    InstructionDescriptor::new(opcode::ADDA, "ADDA", 2, alu_imm(AluOp::Add, Ra)),
    InstructionDescriptor::new(opcode::ADDB, "ADDB", 2, alu_imm(AluOp::Add, Rb)),
    InstructionDescriptor::new(opcode::ADDX, "ADDX", 2, alu_imm(AluOp::Add, Rx)),
    InstructionDescriptor::new(opcode::SCF, "SCF", 1, K::SetFlag(Flag::Carry)),
    InstructionDescriptor::new(opcode::CCF, "CCF", 1, K::ClearFlag(Flag::Carry)),
    InstructionDescriptor::new(opcode::SEF, "SEF", 1, K::SetFlag(Flag::Error)),
    InstructionDescriptor::new(opcode::CEF, "CEF", 1, K::ClearFlag(Flag::Error)),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{opcode, InstructionKind, FALLBACK_INSTRUCTION, STANDARD_INSTRUCTIONS};

    #[test]
    fn table_opcodes_are_unique() {
        let mut seen = HashSet::new();
        for descriptor in STANDARD_INSTRUCTIONS {
            assert!(
                seen.insert(descriptor.opcode),
                "duplicate opcode {:#04X}",
                descriptor.opcode
            );
        }
    }

    #[test]
    fn table_names_are_unique() {
        let mut seen = HashSet::new();
        for descriptor in STANDARD_INSTRUCTIONS {
            assert!(seen.insert(descriptor.name), "duplicate name {}", descriptor.name);
        }
    }

    #[test]
    fn table_is_sorted_by_opcode() {
        assert!(STANDARD_INSTRUCTIONS
            .windows(2)
            .all(|pair| pair[0].opcode < pair[1].opcode));
    }

    #[test]
    fn fallback_descriptor_is_a_no_operation() {
        let fallback = STANDARD_INSTRUCTIONS
            .iter()
            .find(|descriptor| descriptor.name == FALLBACK_INSTRUCTION)
            .unwrap();
        assert_eq!(fallback.opcode, opcode::NOP);
        assert_eq!(fallback.kind, InstructionKind::Nop);
    }

    #[test]
    fn lengths_are_one_to_three_words() {
        assert!(STANDARD_INSTRUCTIONS
            .iter()
            .all(|descriptor| (1..=3).contains(&descriptor.length)));
    }
}
