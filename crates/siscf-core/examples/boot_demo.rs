//! Boots a small program through the vectored reset, prints a disassembly,
//! runs it to HALT and prints the retired instruction stream.
//!
//! `RUST_LOG=siscf_core=trace cargo run --example boot_demo` also shows the
//! engine's own log lines.

use std::sync::Arc;

use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use siscf_core::{
    disassemble_range, opcode, Core, CoreConfig, FlatMemory, GeneralRegister, InstructionRegistry,
    MemoryImageError, RegistryError, TickOutcome, TraceEvent, TraceSink, DEFAULT_RESET_VECTOR,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const PROGRAM_BASE: u32 = 0x10;
const CYCLE_LIMIT: u64 = 1_000;

#[derive(Debug, Error)]
enum DemoError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Image(#[from] MemoryImageError),
    #[error("program did not halt within {0} cycles")]
    NoHalt(u64),
}

/// Prints each commit as it happens.
struct CommitPrinter<'a> {
    registry: &'a InstructionRegistry,
}

impl TraceSink for CommitPrinter<'_> {
    fn on_event(&mut self, event: TraceEvent) {
        if let TraceEvent::Commit { opcode, next_ip } = event {
            let name = self.registry.lookup(opcode).name;
            println!("  retired {name:<8} next ip {next_ip:#06x}");
        }
    }
}

fn fingerprint(words: &[u32]) -> u64 {
    words.iter().fold(0xCBF2_9CE4_8422_2325, |hash, word| {
        word.to_le_bytes()
            .iter()
            .fold(hash, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(0x100_0000_01B3))
    })
}

fn main() -> Result<(), DemoError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let program = [
        opcode::LDA,
        5,
        opcode::LDB_ABS,
        0x40,
        opcode::PUSHA,
        opcode::ADDA_ABS,
        0x40,
        opcode::STA,
        0x41,
        opcode::POPX,
        opcode::MOV,
        GeneralRegister::Rx.register_id(),
        0x42,
        opcode::HALT,
    ];
    let mut memory = FlatMemory::new(0x100);
    memory.load(DEFAULT_RESET_VECTOR, PROGRAM_BASE)?;
    memory.load_words(PROGRAM_BASE, &program)?;
    memory.load(0x40, 37)?;

    let registry = Arc::new(InstructionRegistry::standard()?);
    println!("listing:");
    for row in disassemble_range(&registry, memory.as_words(), PROGRAM_BASE, program.len()) {
        println!("  {row}");
    }

    let mut core = Core::new(CoreConfig::for_memory(&memory), Arc::clone(&registry));
    let mut printer = CommitPrinter {
        registry: &registry,
    };
    println!("run:");
    loop {
        if core.cycle() >= CYCLE_LIMIT {
            return Err(DemoError::NoHalt(CYCLE_LIMIT));
        }
        if let TickOutcome::Retired { halted: true, .. } = core.tick_traced(&mut memory, &mut printer)
        {
            break;
        }
    }

    let observation = core.observe();
    info!(cycles = observation.cycle, "halted");
    println!(
        "A={} B={} X={} SP={:#x} [0x41]={} [0x42]={}",
        observation.ra,
        observation.rb,
        observation.rx,
        observation.sp,
        memory.read(0x41),
        memory.read(0x42),
    );
    println!("memory fingerprint {:016x}", fingerprint(memory.as_words()));
    Ok(())
}
