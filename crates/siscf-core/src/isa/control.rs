//! Flow control and flag instructions.

use crate::execute::{FlagsUpdate, StepEffect};
use crate::state::Flag;

use super::StepContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpStep {
    Advance = 1,
    Target = 2,
}

impl JumpStep {
    const fn at(state: u8) -> Self {
        match state {
            2 => Self::Target,
            _ => Self::Advance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchStep {
    Decide = 1,
    Target = 2,
}

impl BranchStep {
    const fn at(state: u8) -> Self {
        match state {
            2 => Self::Target,
            _ => Self::Decide,
        }
    }
}

pub(super) const fn halt(ctx: &StepContext<'_>) -> StepEffect {
    StepEffect::end(ctx.regs.ip())
}

pub(super) const fn nop(ctx: &StepContext<'_>) -> StepEffect {
    StepEffect::end(ctx.following_ip())
}

pub(super) const fn set_flag(ctx: &StepContext<'_>, flag: Flag) -> StepEffect {
    StepEffect::end(ctx.following_ip()).with_flags(FlagsUpdate::Set(flag))
}

pub(super) const fn clear_flag(ctx: &StepContext<'_>, flag: Flag) -> StepEffect {
    StepEffect::end(ctx.following_ip()).with_flags(FlagsUpdate::Clear(flag))
}

pub(super) const fn jump(ctx: &StepContext<'_>) -> StepEffect {
    match JumpStep::at(ctx.micro_state) {
        JumpStep::Advance => StepEffect::advance_to(JumpStep::Target as u8),
        JumpStep::Target => StepEffect::end(ctx.data_in),
    }
}

/// Not-taken branches skip the whole instruction by its declared length.
pub(super) const fn branch(ctx: &StepContext<'_>, flag: Flag, when_set: bool) -> StepEffect {
    match BranchStep::at(ctx.micro_state) {
        BranchStep::Decide => {
            if ctx.regs.flags().contains(flag) == when_set {
                StepEffect::advance_to(BranchStep::Target as u8)
            } else {
                StepEffect::end(ctx.regs.ip().wrapping_add(ctx.length as u32))
            }
        }
        BranchStep::Target => StepEffect::end(ctx.data_in),
    }
}
