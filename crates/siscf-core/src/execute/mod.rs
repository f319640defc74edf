//! Cycle-stepped execution engine.
//!
//! One call to [`Core::tick`] is one clock. Each clock the engine presents its
//! bus port to memory, then either holds (stall), advances the reset
//! sequence, fetches an opcode, or runs one execution cycle of the current
//! instruction. An instruction returns to fetch only through its single
//! end-of-instruction commit.

mod commit;
mod effect;
mod flags;

pub use commit::commit_step;
pub use effect::{AluRequest, StepEffect, Transition};
pub use flags::FlagsUpdate;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::api::{
    BootMode, BusRequest, BusResponse, CoreConfig, MemoryBus, NullTrace, RunBoundary, RunOutcome,
    TickOutcome, TraceEvent, TraceSink,
};
use crate::diag::CoreObservation;
use crate::error::{CoreError, RegistryError};
use crate::isa::{InstructionKind, StepContext};
use crate::registry::InstructionRegistry;
use crate::state::{GeneralRegister, RegisterFile, ResetState};

/// One SISC-F core: register file, sequencing state and bus port.
#[derive(Debug, Clone)]
pub struct Core {
    config: CoreConfig,
    registry: Arc<InstructionRegistry>,
    regs: RegisterFile,
    port: BusRequest,
    reset_state: ResetState,
    micro_state: u8,
    cycle: u64,
    reset_line: bool,
}

impl Core {
    /// Core in its power-on state sharing `registry`.
    #[must_use]
    pub fn new(config: CoreConfig, registry: Arc<InstructionRegistry>) -> Self {
        let mut regs = RegisterFile::default();
        if let Some(top) = config.stack_top {
            regs.set_sp(top);
        }
        Self {
            config,
            registry,
            regs,
            port: BusRequest::default(),
            reset_state: ResetState::Start,
            micro_state: 0,
            cycle: 0,
            reset_line: false,
        }
    }

    /// Core over a freshly built standard registry.
    ///
    /// # Errors
    ///
    /// Propagates [`InstructionRegistry::standard`] failures.
    pub fn with_standard_isa(config: CoreConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(config, Arc::new(InstructionRegistry::standard()?)))
    }

    /// Construction parameters.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Shared instruction registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<InstructionRegistry> {
        &self.registry
    }

    /// Register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Bus port the next clock will drive.
    #[must_use]
    pub const fn bus_request(&self) -> BusRequest {
        self.port
    }

    /// Reset sequencer state.
    #[must_use]
    pub const fn reset_state(&self) -> ResetState {
        self.reset_state
    }

    /// Current micro-state; `0` means the next execution clock fetches.
    #[must_use]
    pub const fn micro_state(&self) -> u8 {
        self.micro_state
    }

    /// Clocks since construction.
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// True while the reset line is held.
    #[must_use]
    pub const fn reset_asserted(&self) -> bool {
        self.reset_line
    }

    /// Snapshot for hosts and tests.
    #[must_use]
    pub const fn observe(&self) -> CoreObservation {
        CoreObservation {
            ip: self.regs.ip(),
            ir: self.regs.ir(),
            ra: self.regs.gpr(GeneralRegister::Ra),
            rb: self.regs.gpr(GeneralRegister::Rb),
            rx: self.regs.gpr(GeneralRegister::Rx),
            sp: self.regs.sp(),
            flags: self.regs.flags(),
            micro_state: self.micro_state,
            reset_state: self.reset_state,
            cycle: self.cycle,
            bus: self.port,
        }
    }

    /// Edits registers before the reset sequence completes.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotInReset`] once the core is running.
    pub fn preload<F>(&mut self, edit: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut RegisterFile),
    {
        if self.reset_state.is_running() {
            return Err(CoreError::NotInReset);
        }
        edit(&mut self.regs);
        Ok(())
    }

    /// Drives the reset line.
    ///
    /// Asserting it abandons the current instruction and rewinds the reset
    /// sequence. Registers keep their values; scratch cells are cleared when
    /// the sequence completes.
    pub fn set_reset(&mut self, asserted: bool) {
        if asserted && !self.reset_line {
            debug!(ip = self.regs.ip(), "reset asserted");
            self.reset_state = ResetState::Start;
            self.micro_state = 0;
            self.port = BusRequest::default();
        }
        self.reset_line = asserted;
    }

    /// Runs one clock.
    pub fn tick(&mut self, bus: &mut dyn MemoryBus) -> TickOutcome {
        self.tick_traced(bus, &mut NullTrace)
    }

    /// Runs one clock, reporting trace events to `sink`.
    pub fn tick_traced(&mut self, bus: &mut dyn MemoryBus, sink: &mut dyn TraceSink) -> TickOutcome {
        self.cycle = self.cycle.wrapping_add(1);
        if self.reset_line {
            return TickOutcome::HeldInReset;
        }

        let request = self.port;
        let response = bus.transfer(&request);
        if response.stall {
            trace!(address = request.address, "bus stall");
            sink.on_event(TraceEvent::Stalled {
                address: request.address,
                direction: request.direction,
            });
            return TickOutcome::Stalled;
        }
        sink.on_event(TraceEvent::BusTransfer {
            address: request.address,
            value: if request.is_write() {
                request.data_out
            } else {
                response.data_in
            },
            direction: request.direction,
        });

        if !self.reset_state.is_running() {
            return self.step_reset(response, sink);
        }
        if self.micro_state == 0 {
            return self.fetch(response, sink);
        }
        self.execute(response, sink)
    }

    /// Clocks the core until `boundary` or `max_cycles` clocks have run.
    pub fn run(
        &mut self,
        bus: &mut dyn MemoryBus,
        boundary: RunBoundary,
        max_cycles: u64,
    ) -> RunOutcome {
        let mut outcome = RunOutcome {
            cycles: 0,
            retired: 0,
            last: None,
            boundary_reached: false,
        };
        while outcome.cycles < max_cycles {
            let tick = self.tick(bus);
            outcome.cycles += 1;
            outcome.last = Some(tick);
            if let TickOutcome::Retired { halted, .. } = tick {
                outcome.retired += 1;
                let reached = match boundary {
                    RunBoundary::InstructionRetired => true,
                    RunBoundary::Halt => halted,
                    RunBoundary::CycleLimit => false,
                };
                if reached {
                    outcome.boundary_reached = true;
                    break;
                }
            }
        }
        outcome
    }

    fn step_reset(&mut self, response: BusResponse, sink: &mut dyn TraceSink) -> TickOutcome {
        match (self.config.boot, self.reset_state) {
            (BootMode::Vectored { vector }, ResetState::Start) => {
                self.port = BusRequest::read(vector);
                self.reset_state = ResetState::AwaitVector;
                TickOutcome::Resetting
            }
            (BootMode::Vectored { .. }, _) => self.complete_reset(response.data_in, sink),
            (BootMode::Fixed { start }, _) => self.complete_reset(start, sink),
        }
    }

    fn complete_reset(&mut self, start: u32, sink: &mut dyn TraceSink) -> TickOutcome {
        self.regs.clear_scratch();
        self.regs.set_ip(start);
        self.port = BusRequest::read(start);
        self.micro_state = 0;
        self.reset_state = ResetState::Running;
        debug!(start, boot = ?self.config.boot, "reset complete");
        sink.on_event(TraceEvent::ResetComplete { start });
        TickOutcome::ResetComplete { start }
    }

    fn fetch(&mut self, response: BusResponse, sink: &mut dyn TraceSink) -> TickOutcome {
        let opcode = response.data_in;
        let ip = self.regs.ip();
        self.regs.set_ir(opcode);
        self.micro_state = 1;
        trace!(ip, opcode, "fetch");
        sink.on_event(TraceEvent::Fetch { ip, opcode });
        TickOutcome::Fetched { opcode }
    }

    fn execute(&mut self, response: BusResponse, sink: &mut dyn TraceSink) -> TickOutcome {
        let opcode = self.regs.ir();
        let descriptor = *self.registry.lookup(opcode);
        let effect = descriptor.step(&StepContext {
            micro_state: self.micro_state,
            regs: &self.regs,
            data_in: response.data_in,
            length: descriptor.length,
        });

        match commit_step(&mut self.regs, &mut self.port, &effect) {
            Transition::Goto(next) => {
                self.micro_state = next;
                TickOutcome::Stepped { micro_state: next }
            }
            Transition::EndInstruction(next_ip) => {
                self.micro_state = 0;
                trace!(opcode, name = descriptor.name, next_ip, "commit");
                sink.on_event(TraceEvent::Commit { opcode, next_ip });
                TickOutcome::Retired {
                    opcode,
                    next_ip,
                    halted: matches!(descriptor.kind, InstructionKind::Halt),
                }
            }
        }
    }
}
