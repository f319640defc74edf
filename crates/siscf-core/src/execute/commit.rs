use crate::alu;
use crate::api::{BusDirection, BusRequest};
use crate::state::{RegisterFile, Scratch};

use super::{FlagsUpdate, StepEffect, Transition};

/// Applies one cycle's effects to the register file and the bus port.
///
/// Order is fixed: ALU, register writes, flags, scratch, stack unit, IP
/// advance, explicit bus drive, bus release, then commit. Later bus steps win
/// over earlier ones. Returns the transition so the caller can update the
/// micro-state.
pub fn commit_step(regs: &mut RegisterFile, port: &mut BusRequest, effect: &StepEffect) -> Transition {
    if let Some(request) = effect.alu {
        let output = alu::evaluate(request.op, regs.gpr(request.target), request.operand);
        if !output.is_error() {
            regs.set_gpr(request.target, output.value);
        }
        regs.set_flags(output.flags.apply(regs.flags()));
    }

    if let Some((reg, value)) = effect.load {
        regs.set_gpr(reg, value);
        regs.set_flags(FlagsUpdate::from_result(value).apply(regs.flags()));
    }

    if let Some((reg, value)) = effect.register {
        regs.set_gpr(reg, value);
    }

    regs.set_flags(effect.flags.apply(regs.flags()));

    for (cell, value) in Scratch::ALL.into_iter().zip(effect.scratch) {
        if let Some(value) = value {
            regs.set_scratch(cell, value);
        }
    }

    if let Some(request) = effect.stack {
        *port = request.drive(regs);
    }

    if effect.advance_ip {
        let ip = regs.ip().wrapping_add(1);
        regs.set_ip(ip);
        *port = BusRequest::read(ip);
    }

    if let Some(address) = effect.address {
        *port = BusRequest::read(address);
    }

    if let Some(value) = effect.write {
        port.data_out = value;
        port.direction = BusDirection::Write;
    }

    if effect.release_bus {
        port.data_out = 0;
        port.direction = BusDirection::Read;
    }

    if let Transition::EndInstruction(next_ip) = effect.transition {
        regs.set_ip(next_ip);
        port.address = next_ip;
    }

    effect.transition
}
