//! Registry-driven disassembly of word memory.
//!
//! Each row consumes the descriptor's declared length in words. Opcodes the
//! registry does not know render as `.word` directives one word long, even
//! though the engine would execute them as `NOP`.

use std::fmt;

use crate::encoding::InstructionDescriptor;
use crate::isa::InstructionKind;
use crate::registry::InstructionRegistry;
use crate::state::GeneralRegister;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Address of the opcode word.
    pub address: u32,
    /// Words consumed, opcode included.
    pub length: u8,
    /// Opcode word followed by operand words.
    pub raw_words: Vec<u32>,
    /// Mnemonic, or `.word` for unknown opcodes.
    pub mnemonic: String,
    /// Formatted operands, empty when there are none.
    pub operands: String,
    /// True when the registry has no descriptor for the opcode.
    pub is_unknown: bool,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}  {}", self.address, self.mnemonic)?;
        if !self.operands.is_empty() {
            write!(f, " {}", self.operands)?;
        }
        Ok(())
    }
}

/// Disassembles up to `count` consecutive instructions starting at `start`.
///
/// Stops early when an instruction would run past the end of `memory`.
#[must_use]
pub fn disassemble_range(
    registry: &InstructionRegistry,
    memory: &[u32],
    start: u32,
    count: usize,
) -> Vec<DisassemblyRow> {
    let mut rows = Vec::with_capacity(count);
    let mut address = start;
    while rows.len() < count {
        let Some(row) = disassemble_one(registry, memory, address) else {
            break;
        };
        address = address.wrapping_add(u32::from(row.length));
        rows.push(row);
    }
    rows
}

/// Disassembles the instruction at `address`.
///
/// Returns `None` when the opcode or one of its operand words lies outside
/// `memory`.
#[must_use]
pub fn disassemble_one(
    registry: &InstructionRegistry,
    memory: &[u32],
    address: u32,
) -> Option<DisassemblyRow> {
    let opcode = word_at(memory, address)?;
    let Some(descriptor) = registry.get(opcode) else {
        return Some(DisassemblyRow {
            address,
            length: 1,
            raw_words: vec![opcode],
            mnemonic: ".word".to_string(),
            operands: format!("{opcode:#010x}"),
            is_unknown: true,
        });
    };

    let length = descriptor.length.max(1);
    let raw_words = (0..u32::from(length))
        .map(|offset| word_at(memory, address.wrapping_add(offset)))
        .collect::<Option<Vec<u32>>>()?;

    Some(DisassemblyRow {
        address,
        length,
        mnemonic: descriptor.name.to_string(),
        operands: format_operands(descriptor, &raw_words[1..]),
        raw_words,
        is_unknown: false,
    })
}

fn word_at(memory: &[u32], address: u32) -> Option<u32> {
    usize::try_from(address)
        .ok()
        .and_then(|index| memory.get(index))
        .copied()
}

fn format_operands(descriptor: &InstructionDescriptor, operands: &[u32]) -> String {
    let first = operands.first().copied();
    match (descriptor.kind, first) {
        (InstructionKind::LoadImmediate(_) | InstructionKind::AluImmediate { .. }, Some(value)) => {
            format!("#{value:#x}")
        }
        (
            InstructionKind::LoadAbsolute(_)
            | InstructionKind::AluAbsolute { .. }
            | InstructionKind::Store(_)
            | InstructionKind::PushAbsolute
            | InstructionKind::PopAbsolute,
            Some(address),
        ) => format!("[{address:#x}]"),
        (
            InstructionKind::Jump | InstructionKind::Branch { .. } | InstructionKind::Call,
            Some(target),
        ) => format!("{target:#x}"),
        (InstructionKind::Move, _) => operands
            .iter()
            .map(|&operand| move_operand(operand))
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn move_operand(operand: u32) -> String {
    GeneralRegister::from_register_id(operand).map_or_else(
        || format!("[{operand:#x}]"),
        |reg| reg.letter().to_string(),
    )
}
