//! Read-only observation of architectural and sequencing state.

use crate::api::BusRequest;
use crate::state::{Flags, ResetState};

/// Snapshot of everything a host may inspect between clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreObservation {
    /// Instruction pointer.
    pub ip: u32,
    /// Instruction register.
    pub ir: u32,
    /// General register A.
    pub ra: i32,
    /// General register B.
    pub rb: i32,
    /// General register X.
    pub rx: i32,
    /// Stack pointer.
    pub sp: u32,
    /// Flag register.
    pub flags: Flags,
    /// Micro-state, `0` at an instruction boundary.
    pub micro_state: u8,
    /// Reset sequencer state.
    pub reset_state: ResetState,
    /// Clocks since construction, stalls and held-reset clocks included.
    pub cycle: u64,
    /// Bus port the next clock will drive.
    pub bus: BusRequest,
}

impl CoreObservation {
    /// True between instructions of a running core.
    #[must_use]
    pub const fn at_instruction_boundary(&self) -> bool {
        self.reset_state.is_running() && self.micro_state == 0
    }
}
