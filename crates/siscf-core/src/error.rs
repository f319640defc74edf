//! Error types surfaced by construction-time and host-side operations.
//!
//! Clock-level execution never fails; these cover setup mistakes only.

use thiserror::Error;

/// Instruction registry construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two descriptors claim the same opcode.
    #[error(
        "tried to assign instruction {name} to opcode {opcode:#04X}, but it is already assigned to {existing}"
    )]
    DuplicateOpcode {
        /// Contested opcode.
        opcode: u32,
        /// Descriptor being registered.
        name: &'static str,
        /// Descriptor already holding the opcode.
        existing: &'static str,
    },
    /// Two descriptors share a name.
    #[error("instruction name {name} is already registered")]
    DuplicateName {
        /// Repeated name.
        name: &'static str,
    },
    /// No descriptor named by the fallback rule was registered.
    #[error("registry has no {name} instruction to fall back on for unknown opcodes")]
    MissingFallback {
        /// Required fallback name.
        name: &'static str,
    },
}

/// Memory image loading failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryImageError {
    /// Image word lies past the end of memory.
    #[error("address {address:#010X} is outside memory of {depth} words")]
    AddressOutOfRange {
        /// Offending word address.
        address: u32,
        /// Memory depth in words.
        depth: usize,
    },
}

/// Host-side core control failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Register preload attempted after the reset sequence completed.
    #[error("registers can only be preloaded while the core is in reset")]
    NotInReset,
}

#[cfg(test)]
mod tests {
    use super::{MemoryImageError, RegistryError};

    #[test]
    fn duplicate_opcode_message_names_both_instructions() {
        let err = RegistryError::DuplicateOpcode {
            opcode: 0x10,
            name: "JUMP",
            existing: "JMP",
        };
        assert_eq!(
            err.to_string(),
            "tried to assign instruction JUMP to opcode 0x10, but it is already assigned to JMP"
        );
    }

    #[test]
    fn image_error_reports_address_and_depth() {
        let err = MemoryImageError::AddressOutOfRange {
            address: 0x40,
            depth: 16,
        };
        assert_eq!(
            err.to_string(),
            "address 0x00000040 is outside memory of 16 words"
        );
    }
}
