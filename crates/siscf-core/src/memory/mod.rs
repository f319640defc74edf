//! Word-addressed memory models that answer the core's bus.

/// Flat word array with power-on fill and image loading.
pub mod flat;
/// Wait-state adapter that stalls each new transaction.
pub mod wait;

pub use flat::FlatMemory;
pub use wait::WaitStates;

/// Default memory depth in 32-bit words (2^18).
pub const DEFAULT_MEMORY_WORDS: usize = 1 << 18;
