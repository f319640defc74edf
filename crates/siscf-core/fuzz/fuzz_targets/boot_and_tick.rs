#![no_main]

use libfuzzer_sys::fuzz_target;
use siscf_core::{
    disassemble_range, BootMode, Core, CoreConfig, FlatMemory, InstructionRegistry, TickOutcome,
    WaitStates, DEFAULT_RESET_VECTOR,
};

const MEMORY_WORDS: usize = 0x200;
const MAX_CYCLES: u64 = 4_096;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let waits = u32::from(data[0] & 0x3);
    let vectored = data[1] & 0x1 == 1;

    let mut memory = FlatMemory::new(MEMORY_WORDS);
    for (address, chunk) in (0_u32..).zip(data[2..].chunks(4)) {
        let mut bytes = [0xFF; 4];
        bytes[..chunk.len()].copy_from_slice(chunk);
        if memory.load(address, u32::from_le_bytes(bytes)).is_err() {
            break;
        }
    }
    let Ok(registry) = InstructionRegistry::standard() else {
        return;
    };
    let _ = disassemble_range(&registry, memory.as_words(), 0, 64);

    let boot = if vectored {
        BootMode::Vectored {
            vector: DEFAULT_RESET_VECTOR,
        }
    } else {
        BootMode::Fixed { start: 0 }
    };
    let config = CoreConfig {
        boot,
        stack_top: memory.top_address(),
    };
    let mut core = Core::new(config, std::sync::Arc::new(registry));
    let mut bus = WaitStates::new(memory, waits);
    for _ in 0..MAX_CYCLES {
        if let TickOutcome::Retired { next_ip, .. } = core.tick(&mut bus) {
            assert_eq!(core.micro_state(), 0);
            assert_eq!(core.bus_request().address, next_ip);
        }
    }
});
