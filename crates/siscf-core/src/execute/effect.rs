//! Side effects one execution cycle asks the engine to apply.

use crate::alu::AluOp;
use crate::stack::StackRequest;
use crate::state::{GeneralRegister, Scratch};

use super::FlagsUpdate;

/// Where the instruction goes after this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Stay in the instruction and run micro-state `n` next clock.
    Goto(u8),
    /// Commit: next fetch is at the given address.
    EndInstruction(u32),
}

/// ALU evaluation whose result lands in `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AluRequest {
    /// Operation selector.
    pub op: AluOp,
    /// Register supplying operand 1 and receiving the result.
    pub target: GeneralRegister,
    /// Operand 2.
    pub operand: i32,
}

/// Accumulated side effects of one execution cycle.
///
/// Instruction protocols read the pre-cycle state and describe their writes
/// here; the engine applies them all at the clock edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEffect {
    /// Micro-state change or commit.
    pub transition: Transition,
    /// Increment IP and drive a read of the new IP.
    pub advance_ip: bool,
    /// Drive this bus address as a read.
    pub address: Option<u32>,
    /// Drive a write of this value at the current bus address.
    pub write: Option<u32>,
    /// Return the bus to a read with zero write data.
    pub release_bus: bool,
    /// Direct register write with ZERO/NEGATIVE update.
    pub load: Option<(GeneralRegister, i32)>,
    /// Register write without a flag update.
    pub register: Option<(GeneralRegister, i32)>,
    /// ALU request applied to a register.
    pub alu: Option<AluRequest>,
    /// Explicit flag change.
    pub flags: FlagsUpdate,
    /// Stack unit request.
    pub stack: Option<StackRequest>,
    /// Scratch writes indexed by [`Scratch`] order.
    pub scratch: [Option<u32>; 3],
}

impl StepEffect {
    const fn with_transition(transition: Transition) -> Self {
        Self {
            transition,
            advance_ip: false,
            address: None,
            write: None,
            release_bus: false,
            load: None,
            register: None,
            alu: None,
            flags: FlagsUpdate::None,
            stack: None,
            scratch: [None; 3],
        }
    }

    /// Moves to micro-state `state` next clock.
    #[must_use]
    pub const fn goto(state: u8) -> Self {
        Self::with_transition(Transition::Goto(state))
    }

    /// Commits the instruction; the next fetch reads `next_ip`.
    #[must_use]
    pub const fn end(next_ip: u32) -> Self {
        Self::with_transition(Transition::EndInstruction(next_ip))
    }

    /// Advances IP to the next operand word and moves to `state`.
    #[must_use]
    pub const fn advance_to(state: u8) -> Self {
        let mut effect = Self::goto(state);
        effect.advance_ip = true;
        effect
    }

    /// Drives a read of `address`.
    #[must_use]
    pub const fn with_address(mut self, address: u32) -> Self {
        self.address = Some(address);
        self
    }

    /// Drives a write of `value`.
    #[must_use]
    pub const fn with_write(mut self, value: u32) -> Self {
        self.write = Some(value);
        self
    }

    /// Returns the bus to reading.
    #[must_use]
    pub const fn releasing_bus(mut self) -> Self {
        self.release_bus = true;
        self
    }

    /// Loads `value` into `reg`, updating ZERO and NEGATIVE.
    #[must_use]
    pub const fn with_load(mut self, reg: GeneralRegister, value: i32) -> Self {
        self.load = Some((reg, value));
        self
    }

    /// Writes `value` into `reg` leaving flags alone.
    #[must_use]
    pub const fn with_register(mut self, reg: GeneralRegister, value: i32) -> Self {
        self.register = Some((reg, value));
        self
    }

    /// Requests `op` on `target` with `operand` as operand 2.
    #[must_use]
    pub const fn with_alu(mut self, op: AluOp, target: GeneralRegister, operand: i32) -> Self {
        self.alu = Some(AluRequest {
            op,
            target,
            operand,
        });
        self
    }

    /// Applies `update` to the flags.
    #[must_use]
    pub const fn with_flags(mut self, update: FlagsUpdate) -> Self {
        self.flags = update;
        self
    }

    /// Issues a stack unit request.
    #[must_use]
    pub const fn with_stack(mut self, request: StackRequest) -> Self {
        self.stack = Some(request);
        self
    }

    /// Writes `value` into a scratch cell.
    #[must_use]
    pub const fn with_scratch(mut self, cell: Scratch, value: u32) -> Self {
        self.scratch[cell as usize] = Some(value);
        self
    }

    /// True when this cycle commits the instruction.
    #[must_use]
    pub const fn commits(&self) -> bool {
        matches!(self.transition, Transition::EndInstruction(_))
    }
}
