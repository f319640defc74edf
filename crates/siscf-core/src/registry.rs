//! Opcode to instruction mapping with total decode.
//!
//! A registry is built once, then shared read-only (usually behind an `Arc`)
//! by any number of cores. Lookups never fail: opcodes without a descriptor
//! resolve to the `NOP` fallback.

use std::collections::BTreeMap;
use std::collections::HashMap;

use tracing::info;

use crate::encoding::{InstructionDescriptor, FALLBACK_INSTRUCTION, STANDARD_INSTRUCTIONS};
use crate::error::RegistryError;

/// Collects descriptors and checks opcode and name uniqueness.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    by_opcode: BTreeMap<u32, InstructionDescriptor>,
    names: HashMap<&'static str, u32>,
}

impl RegistryBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one descriptor.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateOpcode`] when the opcode is taken and
    /// [`RegistryError::DuplicateName`] when the name is taken.
    pub fn register(&mut self, descriptor: InstructionDescriptor) -> Result<&mut Self, RegistryError> {
        if let Some(existing) = self.by_opcode.get(&descriptor.opcode) {
            return Err(RegistryError::DuplicateOpcode {
                opcode: descriptor.opcode,
                name: descriptor.name,
                existing: existing.name,
            });
        }
        if self.names.contains_key(descriptor.name) {
            return Err(RegistryError::DuplicateName {
                name: descriptor.name,
            });
        }
        self.names.insert(descriptor.name, descriptor.opcode);
        self.by_opcode.insert(descriptor.opcode, descriptor);
        Ok(self)
    }

    /// Adds every descriptor in order, stopping at the first conflict.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register`].
    pub fn register_all(
        &mut self,
        descriptors: &[InstructionDescriptor],
    ) -> Result<&mut Self, RegistryError> {
        for descriptor in descriptors {
            self.register(*descriptor)?;
        }
        Ok(self)
    }

    /// Freezes the registry.
    ///
    /// # Errors
    ///
    /// [`RegistryError::MissingFallback`] when no `NOP` descriptor exists.
    pub fn build(self) -> Result<InstructionRegistry, RegistryError> {
        let fallback = self
            .names
            .get(FALLBACK_INSTRUCTION)
            .and_then(|opcode| self.by_opcode.get(opcode))
            .copied()
            .ok_or(RegistryError::MissingFallback {
                name: FALLBACK_INSTRUCTION,
            })?;
        info!(instructions = self.by_opcode.len(), "instruction registry built");
        Ok(InstructionRegistry {
            by_opcode: self.by_opcode,
            names: self.names,
            fallback,
        })
    }
}

/// Immutable opcode table shared by cores.
#[derive(Debug, Clone)]
pub struct InstructionRegistry {
    by_opcode: BTreeMap<u32, InstructionDescriptor>,
    names: HashMap<&'static str, u32>,
    fallback: InstructionDescriptor,
}

impl InstructionRegistry {
    /// Registry holding [`STANDARD_INSTRUCTIONS`].
    ///
    /// # Errors
    ///
    /// Only if the standard table itself is inconsistent.
    pub fn standard() -> Result<Self, RegistryError> {
        Self::from_descriptors(STANDARD_INSTRUCTIONS)
    }

    /// Registry holding exactly `descriptors`.
    ///
    /// # Errors
    ///
    /// See [`RegistryBuilder::register`] and [`RegistryBuilder::build`].
    pub fn from_descriptors(descriptors: &[InstructionDescriptor]) -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        builder.register_all(descriptors)?;
        builder.build()
    }

    /// Descriptor for `opcode`, or the `NOP` fallback.
    #[must_use]
    pub fn lookup(&self, opcode: u32) -> &InstructionDescriptor {
        self.by_opcode.get(&opcode).unwrap_or(&self.fallback)
    }

    /// Descriptor registered for exactly `opcode`.
    #[must_use]
    pub fn get(&self, opcode: u32) -> Option<&InstructionDescriptor> {
        self.by_opcode.get(&opcode)
    }

    /// Descriptor registered under `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&InstructionDescriptor> {
        self.names
            .get(name)
            .and_then(|opcode| self.by_opcode.get(opcode))
    }

    /// Descriptor unknown opcodes resolve to.
    #[must_use]
    pub const fn fallback(&self) -> &InstructionDescriptor {
        &self.fallback
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_opcode.len()
    }

    /// True when nothing is registered. A built registry always holds the fallback.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_opcode.is_empty()
    }

    /// Descriptors in ascending opcode order.
    pub fn descriptors(&self) -> impl Iterator<Item = &InstructionDescriptor> {
        self.by_opcode.values()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{InstructionRegistry, RegistryBuilder};
    use crate::encoding::{opcode, InstructionDescriptor, STANDARD_INSTRUCTIONS};
    use crate::error::RegistryError;
    use crate::isa::InstructionKind;

    #[test]
    fn standard_registry_holds_every_table_entry() {
        let registry = InstructionRegistry::standard().unwrap();
        assert_eq!(registry.len(), STANDARD_INSTRUCTIONS.len());
        for descriptor in STANDARD_INSTRUCTIONS {
            assert_eq!(registry.get(descriptor.opcode), Some(descriptor));
            assert_eq!(registry.by_name(descriptor.name), Some(descriptor));
        }
    }

    #[test]
    fn duplicate_opcode_is_rejected() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(InstructionDescriptor::new(0x10, "JMP", 3, InstructionKind::Jump))
            .unwrap();
        let err = builder
            .register(InstructionDescriptor::new(0x10, "JUMP", 3, InstructionKind::Jump))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateOpcode {
                opcode: 0x10,
                name: "JUMP",
                existing: "JMP"
            }
        );
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let err = InstructionRegistry::from_descriptors(&[
            InstructionDescriptor::new(0x01, "NOP", 1, InstructionKind::Nop),
            InstructionDescriptor::new(0x02, "NOP", 1, InstructionKind::Nop),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName { name: "NOP" });
    }

    #[test]
    fn registry_without_nop_is_rejected() {
        let err = InstructionRegistry::from_descriptors(&[InstructionDescriptor::new(
            0x00,
            "HALT",
            1,
            InstructionKind::Halt,
        )])
        .unwrap_err();
        assert!(matches!(err, RegistryError::MissingFallback { .. }));
    }

    #[test]
    fn iteration_is_in_opcode_order() {
        let registry = InstructionRegistry::standard().unwrap();
        let opcodes: Vec<u32> = registry.descriptors().map(|d| d.opcode).collect();
        let mut sorted = opcodes.clone();
        sorted.sort_unstable();
        assert_eq!(opcodes, sorted);
        assert_eq!(opcodes.first(), Some(&opcode::HALT));
    }

    proptest! {
        #[test]
        fn every_opcode_decodes(word in any::<u32>()) {
            let registry = InstructionRegistry::standard().unwrap();
            let descriptor = registry.lookup(word);
            match registry.get(word) {
                Some(exact) => prop_assert_eq!(descriptor, exact),
                None => prop_assert_eq!(descriptor.name, "NOP"),
            }
        }
    }
}
