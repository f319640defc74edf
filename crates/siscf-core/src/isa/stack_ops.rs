//! Push, pop, call and return protocols built on the stack unit.

use crate::execute::StepEffect;
use crate::stack::StackRequest;
use crate::state::{GeneralRegister, Scratch};

use super::StepContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PushRegisterStep {
    Push = 1,
    Settle = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PushAbsoluteStep {
    Advance = 1,
    Address = 2,
    Push = 3,
    Settle = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PopRegisterStep {
    Pop = 1,
    Consume = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PopAbsoluteStep {
    Pop = 1,
    Latch = 2,
    Write = 3,
    Settle = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallStep {
    Advance = 1,
    Push = 2,
    Settle = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReturnStep {
    Pop = 1,
    Jump = 2,
}

#[allow(clippy::cast_sign_loss)]
pub(super) const fn push_register(ctx: &StepContext<'_>, reg: GeneralRegister) -> StepEffect {
    let step = match ctx.micro_state {
        2 => PushRegisterStep::Settle,
        _ => PushRegisterStep::Push,
    };
    match step {
        PushRegisterStep::Push => StepEffect::goto(PushRegisterStep::Settle as u8)
            .with_stack(StackRequest::Push(ctx.regs.gpr(reg) as u32)),
        PushRegisterStep::Settle => StepEffect::end(ctx.following_ip()).releasing_bus(),
    }
}

pub(super) const fn push_absolute(ctx: &StepContext<'_>) -> StepEffect {
    let step = match ctx.micro_state {
        2 => PushAbsoluteStep::Address,
        3 => PushAbsoluteStep::Push,
        4 => PushAbsoluteStep::Settle,
        _ => PushAbsoluteStep::Advance,
    };
    match step {
        PushAbsoluteStep::Advance => StepEffect::advance_to(PushAbsoluteStep::Address as u8),
        PushAbsoluteStep::Address => {
            StepEffect::goto(PushAbsoluteStep::Push as u8).with_address(ctx.data_in)
        }
        PushAbsoluteStep::Push => StepEffect::goto(PushAbsoluteStep::Settle as u8)
            .with_stack(StackRequest::Push(ctx.data_in)),
        PushAbsoluteStep::Settle => StepEffect::end(ctx.following_ip()).releasing_bus(),
    }
}

pub(super) const fn pop_register(ctx: &StepContext<'_>, reg: GeneralRegister) -> StepEffect {
    let step = match ctx.micro_state {
        2 => PopRegisterStep::Consume,
        _ => PopRegisterStep::Pop,
    };
    match step {
        PopRegisterStep::Pop => {
            StepEffect::goto(PopRegisterStep::Consume as u8).with_stack(StackRequest::Pop)
        }
        PopRegisterStep::Consume => {
            StepEffect::end(ctx.following_ip()).with_register(reg, ctx.signed_data())
        }
    }
}

/// Pops a word and stores it at the operand address, parking it in TMP1 meanwhile.
pub(super) const fn pop_absolute(ctx: &StepContext<'_>) -> StepEffect {
    let step = match ctx.micro_state {
        2 => PopAbsoluteStep::Latch,
        3 => PopAbsoluteStep::Write,
        4 => PopAbsoluteStep::Settle,
        _ => PopAbsoluteStep::Pop,
    };
    match step {
        PopAbsoluteStep::Pop => {
            StepEffect::goto(PopAbsoluteStep::Latch as u8).with_stack(StackRequest::Pop)
        }
        PopAbsoluteStep::Latch => StepEffect::advance_to(PopAbsoluteStep::Write as u8)
            .with_scratch(Scratch::Tmp1, ctx.data_in),
        PopAbsoluteStep::Write => StepEffect::goto(PopAbsoluteStep::Settle as u8)
            .with_address(ctx.data_in)
            .with_write(ctx.regs.scratch(Scratch::Tmp1)),
        PopAbsoluteStep::Settle => StepEffect::end(ctx.following_ip())
            .releasing_bus()
            .with_scratch(Scratch::Tmp1, 0),
    }
}

/// Return address is the word after the operand.
pub(super) const fn call(ctx: &StepContext<'_>) -> StepEffect {
    let step = match ctx.micro_state {
        2 => CallStep::Push,
        3 => CallStep::Settle,
        _ => CallStep::Advance,
    };
    match step {
        CallStep::Advance => StepEffect::advance_to(CallStep::Push as u8),
        CallStep::Push => StepEffect::goto(CallStep::Settle as u8)
            .with_scratch(Scratch::Tmp1, ctx.data_in)
            .with_stack(StackRequest::Push(ctx.following_ip())),
        CallStep::Settle => StepEffect::end(ctx.regs.scratch(Scratch::Tmp1))
            .releasing_bus()
            .with_scratch(Scratch::Tmp1, 0),
    }
}

pub(super) const fn ret(ctx: &StepContext<'_>) -> StepEffect {
    let step = match ctx.micro_state {
        2 => ReturnStep::Jump,
        _ => ReturnStep::Pop,
    };
    match step {
        ReturnStep::Pop => StepEffect::goto(ReturnStep::Jump as u8).with_stack(StackRequest::Pop),
        ReturnStep::Jump => StepEffect::end(ctx.data_in),
    }
}
