//! Architectural CPU state model primitives.

/// Five-bit architectural flag set.
pub mod flags;
/// Architectural register file types and storage model.
pub mod registers;
/// Reset-sequence progress tracking.
pub mod run_state;

pub use flags::{Flag, Flags, FLAGS_ACTIVE_MASK};
pub use registers::{
    BitRange, Field, FieldMut, GeneralRegister, RegisterFile, Scratch, Word, REGISTER_ID_BASE,
    WORD_COUNT,
};
pub use run_state::ResetState;
