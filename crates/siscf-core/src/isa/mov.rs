//! `MOV src, dst`: each operand is either a register id or a memory address.
//!
//! TMP1 carries the value between the two operands and TMP2 marks that the
//! current operand resolved to memory.

use crate::execute::StepEffect;
use crate::state::{GeneralRegister, Scratch};

use super::StepContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveStep {
    Advance = 1,
    Source = 2,
    Latch = 3,
    Destination = 4,
    Write = 5,
    Settle = 6,
}

impl MoveStep {
    const fn at(state: u8) -> Self {
        match state {
            2 => Self::Source,
            3 => Self::Latch,
            4 => Self::Destination,
            5 => Self::Write,
            6 => Self::Settle,
            _ => Self::Advance,
        }
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub(super) const fn step(ctx: &StepContext<'_>) -> StepEffect {
    let in_memory = ctx.regs.scratch(Scratch::Tmp2) != 0;
    let value = ctx.regs.scratch(Scratch::Tmp1);
    match MoveStep::at(ctx.micro_state) {
        MoveStep::Advance => StepEffect::advance_to(MoveStep::Source as u8),
        MoveStep::Source => match GeneralRegister::from_register_id(ctx.data_in) {
            Some(reg) => StepEffect::goto(MoveStep::Latch as u8)
                .with_scratch(Scratch::Tmp1, ctx.regs.gpr(reg) as u32)
                .with_scratch(Scratch::Tmp2, 0),
            None => StepEffect::goto(MoveStep::Latch as u8)
                .with_address(ctx.data_in)
                .with_scratch(Scratch::Tmp2, 1),
        },
        MoveStep::Latch => {
            let effect = StepEffect::advance_to(MoveStep::Destination as u8);
            if in_memory {
                effect
                    .with_scratch(Scratch::Tmp1, ctx.data_in)
                    .with_scratch(Scratch::Tmp2, 0)
            } else {
                effect
            }
        }
        MoveStep::Destination => match GeneralRegister::from_register_id(ctx.data_in) {
            Some(reg) => StepEffect::goto(MoveStep::Write as u8)
                .with_register(reg, value as i32)
                .with_scratch(Scratch::Tmp2, 0),
            None => StepEffect::goto(MoveStep::Write as u8)
                .with_address(ctx.data_in)
                .with_scratch(Scratch::Tmp2, 1),
        },
        MoveStep::Write => {
            let effect = StepEffect::goto(MoveStep::Settle as u8);
            if in_memory {
                effect.with_write(value).with_scratch(Scratch::Tmp2, 0)
            } else {
                effect
            }
        }
        MoveStep::Settle => StepEffect::end(ctx.following_ip())
            .releasing_bus()
            .with_scratch(Scratch::Tmp1, 0),
    }
}
