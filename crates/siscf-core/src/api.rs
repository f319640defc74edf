//! Public host-facing API contracts for embedding the execution core.
//!
//! The core talks to memory through [`MemoryBus`], reports each clock with a
//! [`TickOutcome`] and can stream [`TraceEvent`]s into a [`TraceSink`].

use crate::memory::FlatMemory;

/// Word address the default configuration reads the start address from.
pub const DEFAULT_RESET_VECTOR: u32 = 0x0009;

/// Value a read returns when nothing answers at the requested address.
pub const UNMAPPED_READ: u32 = 0xFFFF_FFFF;

/// How the reset sequencer resolves the first instruction address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BootMode {
    /// Read the start address from memory at `vector`, then jump there.
    Vectored {
        /// Word address holding the start address.
        vector: u32,
    },
    /// Start directly at `start` without touching memory.
    Fixed {
        /// First instruction address.
        start: u32,
    },
}

impl Default for BootMode {
    fn default() -> Self {
        Self::Vectored {
            vector: DEFAULT_RESET_VECTOR,
        }
    }
}

/// Static construction parameters for a [`crate::Core`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Reset sequencing mode.
    pub boot: BootMode,
    /// Initial stack pointer. `None` leaves SP at zero.
    pub stack_top: Option<u32>,
}

impl CoreConfig {
    /// Configuration that boots from a reset vector.
    #[must_use]
    pub const fn vectored(vector: u32) -> Self {
        Self {
            boot: BootMode::Vectored { vector },
            stack_top: None,
        }
    }

    /// Configuration that boots at a fixed address.
    #[must_use]
    pub const fn fixed(start: u32) -> Self {
        Self {
            boot: BootMode::Fixed { start },
            stack_top: None,
        }
    }

    /// Returns a copy with the initial stack pointer set to `top`.
    #[must_use]
    pub const fn with_stack_top(mut self, top: u32) -> Self {
        self.stack_top = Some(top);
        self
    }

    /// Default vectored boot with the stack starting at the top word of `memory`.
    #[must_use]
    pub fn for_memory(memory: &FlatMemory) -> Self {
        Self {
            boot: BootMode::default(),
            stack_top: memory.top_address(),
        }
    }
}

/// Direction of the transaction currently driven on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BusDirection {
    /// Memory answers with the word at the address.
    #[default]
    Read,
    /// Memory stores `data_out` at the address.
    Write,
}

/// Bus port as driven by the core for one clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BusRequest {
    /// Word address.
    pub address: u32,
    /// Value to store; only meaningful for writes.
    pub data_out: u32,
    /// Read or write.
    pub direction: BusDirection,
}

impl BusRequest {
    /// Read request for `address`.
    #[must_use]
    pub const fn read(address: u32) -> Self {
        Self {
            address,
            data_out: 0,
            direction: BusDirection::Read,
        }
    }

    /// Write request storing `value` at `address`.
    #[must_use]
    pub const fn write(address: u32, value: u32) -> Self {
        Self {
            address,
            data_out: value,
            direction: BusDirection::Write,
        }
    }

    /// True when this request stores a word.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self.direction, BusDirection::Write)
    }
}

/// Memory's answer to one bus clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BusResponse {
    /// Word read back. Undefined while stalled and during writes.
    pub data_in: u32,
    /// Transaction not finished; the core must hold everything.
    pub stall: bool,
}

impl BusResponse {
    /// Completed transaction carrying `data_in`.
    #[must_use]
    pub const fn ready(data_in: u32) -> Self {
        Self {
            data_in,
            stall: false,
        }
    }

    /// Transaction still in flight.
    #[must_use]
    pub const fn stalled() -> Self {
        Self {
            data_in: 0,
            stall: true,
        }
    }
}

/// Memory side of the core's bus.
///
/// Called exactly once per core clock with the request the core is driving.
/// A read response must reflect the addressed word as it was before any write
/// presented in the same call.
pub trait MemoryBus {
    /// Performs (or continues) one clock of the transaction described by `request`.
    fn transfer(&mut self, request: &BusRequest) -> BusResponse;
}

impl<B: MemoryBus + ?Sized> MemoryBus for &mut B {
    fn transfer(&mut self, request: &BusRequest) -> BusResponse {
        (**self).transfer(request)
    }
}

/// What happened during a single clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TickOutcome {
    /// Reset line asserted; nothing ran and the bus was not driven.
    HeldInReset,
    /// Reset sequence issued the vector read and waits for its data.
    Resetting,
    /// Reset sequence finished; the next clock fetches from `start`.
    ResetComplete {
        /// Resolved first instruction address.
        start: u32,
    },
    /// Bus stalled; all state held.
    Stalled,
    /// Opcode latched into IR.
    Fetched {
        /// Word latched into IR.
        opcode: u32,
    },
    /// An execution cycle ran and moved to another micro-state.
    Stepped {
        /// Micro-state the next clock will run.
        micro_state: u8,
    },
    /// The current instruction committed.
    Retired {
        /// Opcode of the retired instruction.
        opcode: u32,
        /// Address of the next fetch.
        next_ip: u32,
        /// True when the retired instruction was HALT.
        halted: bool,
    },
}

/// Stop condition for [`crate::Core::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunBoundary {
    /// Stop after the next instruction commit.
    InstructionRetired,
    /// Stop after HALT commits.
    Halt,
    /// Only the cycle limit stops the run.
    CycleLimit,
}

/// Aggregated outcome from clocking the core until a boundary or cycle limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Clocks consumed by this call.
    pub cycles: u64,
    /// Instructions committed during this call.
    pub retired: u64,
    /// Outcome of the last clock, `None` if no clock ran.
    pub last: Option<TickOutcome>,
    /// True when the requested boundary stopped the run.
    pub boundary_reached: bool,
}

/// Trace events emitted in clock order by [`crate::Core::tick_traced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TraceEvent {
    /// Completed bus transaction.
    BusTransfer {
        /// Word address.
        address: u32,
        /// Word read, or word written for writes.
        value: u32,
        /// Read or write.
        direction: BusDirection,
    },
    /// Clock lost to a bus stall.
    Stalled {
        /// Address held on the bus.
        address: u32,
        /// Direction held on the bus.
        direction: BusDirection,
    },
    /// Reset sequence resolved its start address.
    ResetComplete {
        /// First instruction address.
        start: u32,
    },
    /// Opcode fetched.
    Fetch {
        /// Address of the opcode word.
        ip: u32,
        /// Opcode latched into IR.
        opcode: u32,
    },
    /// Instruction committed.
    Commit {
        /// Opcode of the committed instruction.
        opcode: u32,
        /// Next fetch address.
        next_ip: u32,
    },
}

/// Sink trait for trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}

#[cfg(test)]
mod tests {
    use super::{
        BootMode, BusDirection, BusRequest, BusResponse, CoreConfig, TraceEvent, TraceSink,
        DEFAULT_RESET_VECTOR,
    };

    #[test]
    fn default_config_boots_from_vector() {
        let config = CoreConfig::default();
        assert_eq!(
            config.boot,
            BootMode::Vectored {
                vector: DEFAULT_RESET_VECTOR
            }
        );
        assert_eq!(config.stack_top, None);
    }

    #[test]
    fn builders_set_boot_mode_and_stack() {
        let config = CoreConfig::fixed(0x40).with_stack_top(0x3FFFF);
        assert_eq!(config.boot, BootMode::Fixed { start: 0x40 });
        assert_eq!(config.stack_top, Some(0x3FFFF));
        assert_eq!(
            CoreConfig::vectored(3).boot,
            BootMode::Vectored { vector: 3 }
        );
    }

    #[test]
    fn request_constructors_set_direction() {
        let read = BusRequest::read(7);
        assert_eq!(read.direction, BusDirection::Read);
        assert!(!read.is_write());
        let write = BusRequest::write(7, 42);
        assert!(write.is_write());
        assert_eq!(write.data_out, 42);
    }

    #[test]
    fn stalled_response_flags_stall() {
        assert!(BusResponse::stalled().stall);
        assert!(!BusResponse::ready(1).stall);
    }

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink = Vec::new();
        sink.on_event(TraceEvent::ResetComplete { start: 1 });
        sink.on_event(TraceEvent::Fetch { ip: 1, opcode: 0 });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0], TraceEvent::ResetComplete { start: 1 });
    }
}
