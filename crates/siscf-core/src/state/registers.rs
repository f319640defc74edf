use super::flags::Flags;

/// Number of 32-bit words held by the register file.
pub const WORD_COUNT: usize = 12;

/// Base of the register-id sentinel range used by `MOV` operands.
///
/// `0xFFFF_FF00` names `RA`, `0xFFFF_FF01` names `RB`, `0xFFFF_FF02` names `RX`.
pub const REGISTER_ID_BASE: u32 = 0xFFFF_FF00;

/// Architecturally visible signed general-purpose register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum GeneralRegister {
    Ra,
    Rb,
    Rx,
}

impl GeneralRegister {
    /// Ordered list of all general-purpose registers.
    pub const ALL: [Self; 3] = [Self::Ra, Self::Rb, Self::Rx];

    /// Storage word backing this register.
    #[must_use]
    pub const fn word(self) -> Word {
        match self {
            Self::Ra => Word::Ra,
            Self::Rb => Word::Rb,
            Self::Rx => Word::Rx,
        }
    }

    /// Sentinel value that names this register in a `MOV` operand.
    #[must_use]
    pub const fn register_id(self) -> u32 {
        match self {
            Self::Ra => REGISTER_ID_BASE,
            Self::Rb => REGISTER_ID_BASE + 1,
            Self::Rx => REGISTER_ID_BASE + 2,
        }
    }

    /// Resolves a `MOV` operand sentinel to a register.
    ///
    /// Any other value is a memory address and yields `None`.
    #[must_use]
    pub const fn from_register_id(value: u32) -> Option<Self> {
        match value {
            REGISTER_ID_BASE => Some(Self::Ra),
            0xFFFF_FF01 => Some(Self::Rb),
            0xFFFF_FF02 => Some(Self::Rx),
            _ => None,
        }
    }

    /// Assembler-facing register letter.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Ra => 'A',
            Self::Rb => 'B',
            Self::Rx => 'X',
        }
    }
}

/// Execution-local scratch cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Scratch {
    Tmp1,
    Tmp2,
    Tmp3,
}

impl Scratch {
    /// All scratch cells.
    pub const ALL: [Self; 3] = [Self::Tmp1, Self::Tmp2, Self::Tmp3];

    /// Storage word backing this cell.
    #[must_use]
    pub const fn word(self) -> Word {
        match self {
            Self::Tmp1 => Word::Tmp1,
            Self::Tmp2 => Word::Tmp2,
            Self::Tmp3 => Word::Tmp3,
        }
    }
}

/// Every 32-bit storage word of the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Word {
    /// General register A.
    Ra = 0,
    /// General register B.
    Rb = 1,
    /// General register X.
    Rx = 2,
    /// Program counter.
    Ip = 3,
    /// Stack pointer.
    Sp = 4,
    /// Auxiliary pointer, reserved.
    Qp = 5,
    /// Instruction register, latched on fetch.
    Ir = 6,
    /// Scratch cell 1.
    Tmp1 = 7,
    /// Scratch cell 2.
    Tmp2 = 8,
    /// Scratch cell 3.
    Tmp3 = 9,
    /// Interrupt argument storage, reserved.
    InterruptArgs = 10,
    /// Interrupt return storage, reserved.
    InterruptReturn = 11,
}

impl Word {
    /// Returns the storage index (`0..WORD_COUNT`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Contiguous bit range inside a 32-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRange {
    lsb: u8,
    width: u8,
}

impl BitRange {
    /// Bits `0..16`.
    pub const LOW_HALF: Self = Self { lsb: 0, width: 16 };
    /// Bits `16..32`.
    pub const HIGH_HALF: Self = Self { lsb: 16, width: 16 };
    /// Bits `0..8`.
    pub const BYTE_0: Self = Self { lsb: 0, width: 8 };
    /// Bits `8..16`.
    pub const BYTE_1: Self = Self { lsb: 8, width: 8 };
    /// Bits `16..24`.
    pub const BYTE_2: Self = Self { lsb: 16, width: 8 };
    /// Bits `24..32`.
    pub const BYTE_3: Self = Self { lsb: 24, width: 8 };
    /// The whole word.
    pub const FULL: Self = Self { lsb: 0, width: 32 };

    /// Creates a range, rejecting empty ranges and ranges past bit 31.
    #[must_use]
    pub const fn new(lsb: u8, width: u8) -> Option<Self> {
        if width == 0 || lsb as u16 + width as u16 > 32 {
            None
        } else {
            Some(Self { lsb, width })
        }
    }

    /// Lowest bit covered by this range.
    #[must_use]
    pub const fn lsb(self) -> u8 {
        self.lsb
    }

    /// Number of bits covered.
    #[must_use]
    pub const fn width(self) -> u8 {
        self.width
    }

    /// Right-aligned mask of `width` ones.
    #[must_use]
    pub const fn value_mask(self) -> u32 {
        if self.width == 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    const fn extract(self, word: u32) -> u32 {
        (word >> self.lsb) & self.value_mask()
    }

    const fn insert(self, word: u32, value: u32) -> u32 {
        let mask = self.value_mask() << self.lsb;
        (word & !mask) | ((value << self.lsb) & mask)
    }
}

/// Read-only view of a bit range inside a register word.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    word: &'a u32,
    range: BitRange,
}

impl Field<'_> {
    /// Reads the field, right-aligned.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.range.extract(*self.word)
    }
}

/// Mutable view of a bit range inside a register word.
///
/// Writes only touch the covered bits; values wider than the range are truncated.
#[derive(Debug)]
pub struct FieldMut<'a> {
    word: &'a mut u32,
    range: BitRange,
}

impl FieldMut<'_> {
    /// Reads the field, right-aligned.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.range.extract(*self.word)
    }

    /// Replaces the field bits with the low bits of `value`.
    pub const fn set(&mut self, value: u32) {
        *self.word = self.range.insert(*self.word, value);
    }
}

/// Full architectural register file for the SISC-F core.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    words: [u32; WORD_COUNT],
    flags: Flags,
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
impl RegisterFile {
    /// Reads a raw storage word.
    #[must_use]
    pub const fn word(&self, word: Word) -> u32 {
        self.words[word.index()]
    }

    /// Writes a raw storage word.
    pub const fn set_word(&mut self, word: Word, value: u32) {
        self.words[word.index()] = value;
    }

    /// Borrows a bit range of `word` for reading.
    #[must_use]
    pub const fn field(&self, word: Word, range: BitRange) -> Field<'_> {
        Field {
            word: &self.words[word.index()],
            range,
        }
    }

    /// Borrows a bit range of `word` for in-place update.
    pub const fn field_mut(&mut self, word: Word, range: BitRange) -> FieldMut<'_> {
        FieldMut {
            word: &mut self.words[word.index()],
            range,
        }
    }

    /// Reads a general-purpose register as a signed value.
    #[must_use]
    pub const fn gpr(&self, reg: GeneralRegister) -> i32 {
        self.word(reg.word()) as i32
    }

    /// Writes a general-purpose register.
    pub const fn set_gpr(&mut self, reg: GeneralRegister, value: i32) {
        self.set_word(reg.word(), value as u32);
    }

    /// Reads `IP`.
    #[must_use]
    pub const fn ip(&self) -> u32 {
        self.word(Word::Ip)
    }

    /// Writes `IP`.
    pub const fn set_ip(&mut self, value: u32) {
        self.set_word(Word::Ip, value);
    }

    /// Reads `SP`.
    #[must_use]
    pub const fn sp(&self) -> u32 {
        self.word(Word::Sp)
    }

    /// Writes `SP`.
    pub const fn set_sp(&mut self, value: u32) {
        self.set_word(Word::Sp, value);
    }

    /// Reads `QP`.
    #[must_use]
    pub const fn qp(&self) -> u32 {
        self.word(Word::Qp)
    }

    /// Writes `QP`.
    pub const fn set_qp(&mut self, value: u32) {
        self.set_word(Word::Qp, value);
    }

    /// Reads `IR`.
    #[must_use]
    pub const fn ir(&self) -> u32 {
        self.word(Word::Ir)
    }

    /// Writes `IR`.
    pub const fn set_ir(&mut self, value: u32) {
        self.set_word(Word::Ir, value);
    }

    /// Reads a scratch cell.
    #[must_use]
    pub const fn scratch(&self, cell: Scratch) -> u32 {
        self.word(cell.word())
    }

    /// Writes a scratch cell.
    pub const fn set_scratch(&mut self, cell: Scratch, value: u32) {
        self.set_word(cell.word(), value);
    }

    /// Zeroes every scratch cell.
    pub const fn clear_scratch(&mut self) {
        self.set_word(Word::Tmp1, 0);
        self.set_word(Word::Tmp2, 0);
        self.set_word(Word::Tmp3, 0);
    }

    /// Returns `true` when every scratch cell is zero.
    #[must_use]
    pub const fn scratch_is_clear(&self) -> bool {
        self.word(Word::Tmp1) == 0 && self.word(Word::Tmp2) == 0 && self.word(Word::Tmp3) == 0
    }

    /// Reads the flag register.
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Replaces the flag register.
    pub const fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    /// Mutable access to the flag register.
    pub const fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::{BitRange, GeneralRegister, RegisterFile, Scratch, Word, REGISTER_ID_BASE};
    use crate::state::{Flag, Flags};

    #[test]
    fn general_registers_are_signed_and_independent() {
        let mut regs = RegisterFile::default();
        regs.set_gpr(GeneralRegister::Ra, -3);
        regs.set_gpr(GeneralRegister::Rb, i32::MAX);
        regs.set_gpr(GeneralRegister::Rx, i32::MIN);

        assert_eq!(regs.gpr(GeneralRegister::Ra), -3);
        assert_eq!(regs.gpr(GeneralRegister::Rb), i32::MAX);
        assert_eq!(regs.gpr(GeneralRegister::Rx), i32::MIN);
        assert_eq!(regs.word(Word::Ra), 0xFFFF_FFFD);
    }

    #[test]
    fn register_id_sentinels_resolve_to_registers() {
        for reg in GeneralRegister::ALL {
            assert_eq!(GeneralRegister::from_register_id(reg.register_id()), Some(reg));
        }
        assert_eq!(GeneralRegister::from_register_id(REGISTER_ID_BASE + 3), None);
        assert_eq!(GeneralRegister::from_register_id(0x15), None);
    }

    #[test]
    fn half_views_address_register_halves_in_place() {
        let mut regs = RegisterFile::default();
        regs.set_ip(0x1234_5678);

        assert_eq!(regs.field(Word::Ip, BitRange::LOW_HALF).get(), 0x5678);
        assert_eq!(regs.field(Word::Ip, BitRange::HIGH_HALF).get(), 0x1234);

        regs.field_mut(Word::Ip, BitRange::HIGH_HALF).set(0xABCD);
        assert_eq!(regs.ip(), 0xABCD_5678);

        regs.field_mut(Word::Ip, BitRange::BYTE_0).set(0x1FF);
        assert_eq!(regs.ip(), 0xABCD_56FF);
    }

    #[test]
    fn byte_views_cover_signed_registers() {
        let mut regs = RegisterFile::default();
        regs.set_gpr(GeneralRegister::Ra, -1);

        regs.field_mut(Word::Ra, BitRange::BYTE_3).set(0x7F);
        assert_eq!(regs.gpr(GeneralRegister::Ra), 0x7FFF_FFFF);
        assert_eq!(regs.field(Word::Ra, BitRange::BYTE_1).get(), 0xFF);
    }

    #[test]
    fn bit_range_rejects_invalid_ranges() {
        assert!(BitRange::new(0, 0).is_none());
        assert!(BitRange::new(24, 9).is_none());
        assert_eq!(BitRange::new(0, 32), Some(BitRange::FULL));
        assert_eq!(BitRange::FULL.value_mask(), u32::MAX);
    }

    #[test]
    fn scratch_cells_clear_together() {
        let mut regs = RegisterFile::default();
        for (value, cell) in (1_u32..).zip(Scratch::ALL) {
            regs.set_scratch(cell, value);
        }
        assert!(!regs.scratch_is_clear());

        regs.clear_scratch();
        assert!(regs.scratch_is_clear());
    }

    #[test]
    fn flags_are_stored_alongside_words() {
        let mut regs = RegisterFile::default();
        regs.flags_mut().set(Flag::Carry, true);
        assert!(regs.flags().contains(Flag::Carry));

        regs.set_flags(Flags::EMPTY);
        assert_eq!(regs.flags(), Flags::EMPTY);
    }
}
