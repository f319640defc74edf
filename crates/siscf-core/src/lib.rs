//! Cycle-stepped execution core for the SISC-F 32-bit CPU.
//!
//! The core is clocked by the host through [`Core::tick`]. Every clock it
//! drives one word transaction on a [`MemoryBus`], and every instruction is a
//! multi-cycle protocol over that bus that ends in exactly one commit.

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    BootMode, BusDirection, BusRequest, BusResponse, CoreConfig, MemoryBus, NullTrace,
    RunBoundary, RunOutcome, TickOutcome, TraceEvent, TraceSink, DEFAULT_RESET_VECTOR,
    UNMAPPED_READ,
};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{Flag, Flags, GeneralRegister, RegisterFile, ResetState, Scratch, Word};

/// Combinational arithmetic unit.
pub mod alu;
pub use alu::{evaluate, AluOp, AluOutput};

/// Stack unit request model.
pub mod stack;
pub use stack::StackRequest;

/// Instruction protocols and the step context they read.
pub mod isa;
pub use isa::{InstructionKind, StepContext};

/// Standard opcode table and instruction descriptors.
pub mod encoding;
pub use encoding::{opcode, InstructionDescriptor, FALLBACK_INSTRUCTION, STANDARD_INSTRUCTIONS};

/// Opcode registry with total decode.
pub mod registry;
pub use registry::{InstructionRegistry, RegistryBuilder};

/// Execution engine.
pub mod execute;
pub use execute::{commit_step, AluRequest, Core, FlagsUpdate, StepEffect, Transition};

/// Memory models for the core's bus.
pub mod memory;
pub use memory::{FlatMemory, WaitStates, DEFAULT_MEMORY_WORDS};

/// Per-shape cycle-cost table.
pub mod timing;
pub use timing::{
    execute_cycles, instruction_cycles, protocol_shape, ProtocolShape, EXECUTE_CYCLE_TABLE,
    FETCH_CYCLES,
};

/// Read-only state observation.
pub mod diag;
pub use diag::CoreObservation;

/// Registry-driven disassembler.
pub mod disasm;
pub use disasm::{disassemble_one, disassemble_range, DisassemblyRow};

/// Error types.
pub mod error;
pub use error::{CoreError, MemoryImageError, RegistryError};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tracing_subscriber as _;
