//! Loads, stores and ALU instructions that take an operand word.

use crate::alu::AluOp;
use crate::execute::StepEffect;
use crate::state::GeneralRegister;

use super::StepContext;

/// Operand word is the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImmediateStep {
    Advance = 1,
    Consume = 2,
}

impl ImmediateStep {
    const fn at(state: u8) -> Self {
        match state {
            2 => Self::Consume,
            _ => Self::Advance,
        }
    }
}

/// Operand word is the address of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AbsoluteStep {
    Advance = 1,
    Address = 2,
    Consume = 3,
}

impl AbsoluteStep {
    const fn at(state: u8) -> Self {
        match state {
            2 => Self::Address,
            3 => Self::Consume,
            _ => Self::Advance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreStep {
    Advance = 1,
    Write = 2,
    Settle = 3,
}

impl StoreStep {
    const fn at(state: u8) -> Self {
        match state {
            2 => Self::Write,
            3 => Self::Settle,
            _ => Self::Advance,
        }
    }
}

/// Shared operand-address cycles; `None` on the cycle that consumes the addressed word.
const fn absolute(ctx: &StepContext<'_>) -> Option<StepEffect> {
    match AbsoluteStep::at(ctx.micro_state) {
        AbsoluteStep::Advance => Some(StepEffect::advance_to(AbsoluteStep::Address as u8)),
        AbsoluteStep::Address => {
            Some(StepEffect::goto(AbsoluteStep::Consume as u8).with_address(ctx.data_in))
        }
        AbsoluteStep::Consume => None,
    }
}

pub(super) const fn load_immediate(ctx: &StepContext<'_>, reg: GeneralRegister) -> StepEffect {
    match ImmediateStep::at(ctx.micro_state) {
        ImmediateStep::Advance => StepEffect::advance_to(ImmediateStep::Consume as u8),
        ImmediateStep::Consume => {
            StepEffect::end(ctx.following_ip()).with_load(reg, ctx.signed_data())
        }
    }
}

pub(super) const fn load_absolute(ctx: &StepContext<'_>, reg: GeneralRegister) -> StepEffect {
    match absolute(ctx) {
        Some(effect) => effect,
        None => StepEffect::end(ctx.following_ip()).with_load(reg, ctx.signed_data()),
    }
}

pub(super) const fn alu_immediate(
    ctx: &StepContext<'_>,
    op: AluOp,
    reg: GeneralRegister,
) -> StepEffect {
    match ImmediateStep::at(ctx.micro_state) {
        ImmediateStep::Advance => StepEffect::advance_to(ImmediateStep::Consume as u8),
        ImmediateStep::Consume => {
            StepEffect::end(ctx.following_ip()).with_alu(op, reg, ctx.signed_data())
        }
    }
}

pub(super) const fn alu_absolute(
    ctx: &StepContext<'_>,
    op: AluOp,
    reg: GeneralRegister,
) -> StepEffect {
    match absolute(ctx) {
        Some(effect) => effect,
        None => StepEffect::end(ctx.following_ip()).with_alu(op, reg, ctx.signed_data()),
    }
}

pub(super) const fn alu_unary(ctx: &StepContext<'_>, op: AluOp, reg: GeneralRegister) -> StepEffect {
    StepEffect::end(ctx.following_ip()).with_alu(op, reg, 0)
}

#[allow(clippy::cast_sign_loss)]
pub(super) const fn store(ctx: &StepContext<'_>, reg: GeneralRegister) -> StepEffect {
    match StoreStep::at(ctx.micro_state) {
        StoreStep::Advance => StepEffect::advance_to(StoreStep::Write as u8),
        StoreStep::Write => StepEffect::goto(StoreStep::Settle as u8)
            .with_address(ctx.data_in)
            .with_write(ctx.regs.gpr(reg) as u32),
        StoreStep::Settle => StepEffect::end(ctx.following_ip()).releasing_bus(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::run_step;
    use super::super::InstructionKind;
    use crate::alu::AluOp;
    use crate::execute::Transition;
    use crate::state::{GeneralRegister, RegisterFile};

    #[test]
    fn absolute_load_drives_operand_address_then_loads() {
        let mut regs = RegisterFile::default();
        regs.set_ip(0x21);
        let kind = InstructionKind::LoadAbsolute(GeneralRegister::Ra);
        let address = run_step(kind, &regs, 2, 0x15);
        assert_eq!(address.address, Some(0x15));
        assert_eq!(address.transition, Transition::Goto(3));
        let load = run_step(kind, &regs, 3, 7);
        assert_eq!(load.load, Some((GeneralRegister::Ra, 7)));
        assert_eq!(load.transition, Transition::EndInstruction(0x22));
    }

    #[test]
    fn immediate_sub_requests_alu_with_operand() {
        let regs = RegisterFile::default();
        let kind = InstructionKind::AluImmediate {
            op: AluOp::Sub,
            reg: GeneralRegister::Rb,
        };
        let effect = run_step(kind, &regs, 2, 3);
        let request = effect.alu.unwrap();
        assert_eq!(request.op, AluOp::Sub);
        assert_eq!(request.target, GeneralRegister::Rb);
        assert_eq!(request.operand, 3);
        assert!(effect.commits());
    }

    #[test]
    fn store_writes_register_then_releases_bus() {
        let mut regs = RegisterFile::default();
        regs.set_gpr(GeneralRegister::Rx, -2);
        let kind = InstructionKind::Store(GeneralRegister::Rx);
        let write = run_step(kind, &regs, 2, 0x100);
        assert_eq!(write.address, Some(0x100));
        assert_eq!(write.write, Some(0xFFFF_FFFE));
        let settle = run_step(kind, &regs, 3, 0);
        assert!(settle.release_bus);
        assert!(settle.commits());
    }
}
