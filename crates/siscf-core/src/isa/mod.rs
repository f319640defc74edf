//! Instruction behaviors as multi-cycle micro-state protocols.
//!
//! Every instruction runs one execution cycle per clock after its fetch. A
//! cycle reads the pre-clock state through [`StepContext`] and returns the
//! [`StepEffect`] the engine applies at the clock edge. Micro-state `0` is the
//! fetch cycle and never reaches these functions.

mod control;
mod load_store;
mod mov;
mod stack_ops;

use crate::alu::AluOp;
use crate::execute::StepEffect;
use crate::state::{Flag, GeneralRegister, RegisterFile};

/// Pre-clock view handed to an instruction's execution cycle.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Current micro-state, `1` on the first execution cycle.
    pub micro_state: u8,
    /// Register file as it was before this clock.
    pub regs: &'a RegisterFile,
    /// Word read by the bus transaction that completed this clock.
    pub data_in: u32,
    /// Declared instruction length in words.
    pub length: u8,
}

impl StepContext<'_> {
    /// `IP + 1`, the usual commit address.
    #[must_use]
    pub const fn following_ip(&self) -> u32 {
        self.regs.ip().wrapping_add(1)
    }

    /// `data_in` reinterpreted as a signed operand.
    #[allow(clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn signed_data(&self) -> i32 {
        self.data_in as i32
    }
}

/// Closed set of instruction behaviors the engine knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    /// Commit to the same address forever.
    Halt,
    /// Commit to the next word.
    Nop,
    /// Raise one flag.
    SetFlag(Flag),
    /// Clear one flag.
    ClearFlag(Flag),
    /// Unconditional jump to the operand word.
    Jump,
    /// Jump when `flag` equals `when_set`, otherwise skip the instruction.
    Branch {
        /// Flag tested on the first execution cycle.
        flag: Flag,
        /// Flag value that takes the branch.
        when_set: bool,
    },
    /// Load the operand word into a register.
    LoadImmediate(GeneralRegister),
    /// Load the word at the operand address into a register.
    LoadAbsolute(GeneralRegister),
    /// ALU operation with the operand word.
    AluImmediate {
        /// Operation selector.
        op: AluOp,
        /// Operand 1 and destination.
        reg: GeneralRegister,
    },
    /// ALU operation with the word at the operand address.
    AluAbsolute {
        /// Operation selector.
        op: AluOp,
        /// Operand 1 and destination.
        reg: GeneralRegister,
    },
    /// Single-operand ALU operation on a register.
    AluUnary {
        /// Operation selector.
        op: AluOp,
        /// Operand and destination.
        reg: GeneralRegister,
    },
    /// Store a register at the operand address.
    Store(GeneralRegister),
    /// Push a register.
    PushRegister(GeneralRegister),
    /// Push the word at the operand address.
    PushAbsolute,
    /// Pop into a register.
    PopRegister(GeneralRegister),
    /// Pop and store at the operand address.
    PopAbsolute,
    /// Push the return address and jump to the operand word.
    Call,
    /// Pop the return address and jump to it.
    Return,
    /// Copy between registers and memory, operands are register ids or addresses.
    Move,
}

impl InstructionKind {
    /// Runs the execution cycle selected by `ctx.micro_state`.
    #[must_use]
    pub const fn step(self, ctx: &StepContext<'_>) -> StepEffect {
        match self {
            Self::Halt => control::halt(ctx),
            Self::Nop => control::nop(ctx),
            Self::SetFlag(flag) => control::set_flag(ctx, flag),
            Self::ClearFlag(flag) => control::clear_flag(ctx, flag),
            Self::Jump => control::jump(ctx),
            Self::Branch { flag, when_set } => control::branch(ctx, flag, when_set),
            Self::LoadImmediate(reg) => load_store::load_immediate(ctx, reg),
            Self::LoadAbsolute(reg) => load_store::load_absolute(ctx, reg),
            Self::AluImmediate { op, reg } => load_store::alu_immediate(ctx, op, reg),
            Self::AluAbsolute { op, reg } => load_store::alu_absolute(ctx, op, reg),
            Self::AluUnary { op, reg } => load_store::alu_unary(ctx, op, reg),
            Self::Store(reg) => load_store::store(ctx, reg),
            Self::PushRegister(reg) => stack_ops::push_register(ctx, reg),
            Self::PushAbsolute => stack_ops::push_absolute(ctx),
            Self::PopRegister(reg) => stack_ops::pop_register(ctx, reg),
            Self::PopAbsolute => stack_ops::pop_absolute(ctx),
            Self::Call => stack_ops::call(ctx),
            Self::Return => stack_ops::ret(ctx),
            Self::Move => mov::step(ctx),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{InstructionKind, StepContext};
    use crate::execute::StepEffect;
    use crate::state::RegisterFile;

    pub(crate) fn run_step(
        kind: InstructionKind,
        regs: &RegisterFile,
        micro_state: u8,
        data_in: u32,
    ) -> StepEffect {
        kind.step(&StepContext {
            micro_state,
            regs,
            data_in,
            length: 1,
        })
    }
}
