//! Reset sequencing, boot modes and the reset line.

use proptest::prelude::*;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use siscf_core::{
    opcode, BootMode, Core, CoreConfig, CoreError, FlatMemory, GeneralRegister, ResetState,
    RunBoundary, Scratch, TickOutcome, DEFAULT_RESET_VECTOR,
};
use thiserror as _;
use tracing as _;
use tracing_subscriber as _;

const MEMORY_WORDS: usize = 0x100;

/// Clocks until the first fetch and returns the fetch address.
fn first_fetch_ip(core: &mut Core, memory: &mut FlatMemory) -> u32 {
    for _ in 0..8 {
        if let TickOutcome::Fetched { .. } = core.tick(memory) {
            return core.registers().ip();
        }
    }
    panic!("core never fetched");
}

#[test]
fn default_config_reads_vector_nine() {
    let mut memory = FlatMemory::with_image(MEMORY_WORDS, [(DEFAULT_RESET_VECTOR, 0x40)]).unwrap();
    let mut core = Core::with_standard_isa(CoreConfig::default()).unwrap();
    assert_eq!(first_fetch_ip(&mut core, &mut memory), 0x40);
}

#[rstest]
#[case(BootMode::Fixed { start: 0x10 }, 0x10, 1)]
#[case(BootMode::Vectored { vector: 0x20 }, 0x33, 2)]
fn reset_takes_documented_clocks(
    #[case] boot: BootMode,
    #[case] start: u32,
    #[case] reset_clocks: u64,
) {
    let mut memory = FlatMemory::with_image(MEMORY_WORDS, [(0x20, 0x33)]).unwrap();
    let mut core = Core::with_standard_isa(CoreConfig {
        boot,
        stack_top: None,
    })
    .unwrap();
    let mut clocks = 0;
    loop {
        clocks += 1;
        if let TickOutcome::ResetComplete { start: resolved } = core.tick(&mut memory) {
            assert_eq!(resolved, start);
            break;
        }
    }
    assert_eq!(clocks, reset_clocks);
    assert_eq!(core.reset_state(), ResetState::Running);
    assert_eq!(core.bus_request().address, start);
}

#[test]
fn reset_clears_scratch_but_keeps_registers() {
    let mut memory = FlatMemory::new(MEMORY_WORDS);
    let mut core = Core::with_standard_isa(CoreConfig::fixed(0)).unwrap();
    core.preload(|regs| {
        regs.set_scratch(Scratch::Tmp1, 5);
        regs.set_scratch(Scratch::Tmp3, 6);
        regs.set_gpr(GeneralRegister::Rb, 7);
    })
    .unwrap();
    core.tick(&mut memory);
    assert!(core.registers().scratch_is_clear());
    assert_eq!(core.registers().gpr(GeneralRegister::Rb), 7);
}

#[test]
fn stack_top_from_memory_depth() {
    let memory = FlatMemory::new(MEMORY_WORDS);
    let core = Core::with_standard_isa(CoreConfig::for_memory(&memory)).unwrap();
    assert_eq!(core.registers().sp(), 0xFF);
}

#[test]
fn reset_line_abandons_instruction_in_flight() {
    let mut memory = FlatMemory::with_image(
        MEMORY_WORDS,
        [(0, opcode::MOV), (1, 0x50), (2, 0x51), (0x50, 3)],
    )
    .unwrap();
    let mut core = Core::with_standard_isa(CoreConfig::fixed(0)).unwrap();
    for _ in 0..4 {
        core.tick(&mut memory);
    }
    assert_ne!(core.micro_state(), 0);

    core.set_reset(true);
    assert_eq!(core.tick(&mut memory), TickOutcome::HeldInReset);
    assert_eq!(core.micro_state(), 0);
    assert_eq!(core.reset_state(), ResetState::Start);
    core.preload(|regs| regs.set_gpr(GeneralRegister::Ra, 1)).unwrap();
    core.set_reset(false);

    assert_eq!(first_fetch_ip(&mut core, &mut memory), 0);
    assert!(core.registers().scratch_is_clear());
    let outcome = core.run(&mut memory, RunBoundary::InstructionRetired, 16);
    assert!(outcome.boundary_reached);
    assert_eq!(memory.read(0x51), 3);
}

#[test]
fn preload_after_boot_is_refused() {
    let mut memory = FlatMemory::new(MEMORY_WORDS);
    let mut core = Core::with_standard_isa(CoreConfig::fixed(0)).unwrap();
    core.tick(&mut memory);
    assert_eq!(core.preload(|_| {}), Err(CoreError::NotInReset));
}

proptest! {
    #[test]
    fn fixed_start_is_first_fetch_regardless_of_registers(
        start in 0_u32..0x100,
        ra in any::<i32>(),
        ip in any::<u32>(),
        sp in any::<u32>(),
    ) {
        let mut memory = FlatMemory::new(MEMORY_WORDS);
        let mut core = Core::with_standard_isa(CoreConfig::fixed(start)).unwrap();
        core.preload(|regs| {
            regs.set_gpr(GeneralRegister::Ra, ra);
            regs.set_ip(ip);
            regs.set_sp(sp);
        }).unwrap();
        prop_assert_eq!(first_fetch_ip(&mut core, &mut memory), start);
    }

    #[test]
    fn vectored_start_is_first_fetch_regardless_of_registers(
        target in 0_u32..0x100,
        ip in any::<u32>(),
        rx in any::<i32>(),
    ) {
        let mut memory = FlatMemory::with_image(MEMORY_WORDS, [(DEFAULT_RESET_VECTOR, target)]).unwrap();
        let mut core = Core::with_standard_isa(CoreConfig::default()).unwrap();
        core.preload(|regs| {
            regs.set_ip(ip);
            regs.set_gpr(GeneralRegister::Rx, rx);
        }).unwrap();
        prop_assert_eq!(first_fetch_ip(&mut core, &mut memory), target);
    }
}
