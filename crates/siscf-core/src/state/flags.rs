/// Mask of architecturally active flag bits (`ZERO/CARRY/NEGATIVE/ERROR/OVERFLOW`).
pub const FLAGS_ACTIVE_MASK: u8 = 0x1F;

/// Architectural flag identifier, valued by its bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Flag {
    /// Last result was zero.
    Zero = 0,
    /// Carry/borrow. Only written by `SCF`/`CCF`.
    Carry = 1,
    /// Last result was negative.
    Negative = 2,
    /// Arithmetic unit rejected its operation.
    Error = 3,
    /// Signed overflow. Reserved.
    Overflow = 4,
}

impl Flag {
    /// Every architectural flag in bit order.
    pub const ALL: [Self; 5] = [
        Self::Zero,
        Self::Carry,
        Self::Negative,
        Self::Error,
        Self::Overflow,
    ];

    /// Returns the single-bit mask for this flag.
    #[must_use]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Fixed 5-bit flag register. Reserved bits always read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Flags(u8);

impl Flags {
    /// No flag set.
    pub const EMPTY: Self = Self(0);

    /// Builds a flag set from raw bits, discarding reserved bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & FLAGS_ACTIVE_MASK)
    }

    /// Returns the raw flag bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: Flag) -> bool {
        self.0 & flag.mask() != 0
    }

    /// Sets or clears a single flag, leaving the others untouched.
    pub const fn set(&mut self, flag: Flag, enabled: bool) {
        if enabled {
            self.0 |= flag.mask();
        } else {
            self.0 &= !flag.mask();
        }
    }

    /// Returns a copy with `flag` set or cleared.
    #[must_use]
    pub const fn with(mut self, flag: Flag, enabled: bool) -> Self {
        self.set(flag, enabled);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Flag, Flags, FLAGS_ACTIVE_MASK};

    #[test]
    fn flag_bits_match_architectural_positions() {
        assert_eq!(Flag::Zero.mask(), 0b0_0001);
        assert_eq!(Flag::Carry.mask(), 0b0_0010);
        assert_eq!(Flag::Negative.mask(), 0b0_0100);
        assert_eq!(Flag::Error.mask(), 0b0_1000);
        assert_eq!(Flag::Overflow.mask(), 0b1_0000);
    }

    #[test]
    fn reserved_bits_are_discarded() {
        assert_eq!(Flags::from_bits(u8::MAX).bits(), FLAGS_ACTIVE_MASK);
        assert_eq!(Flags::from_bits(0xE0), Flags::EMPTY);
    }

    #[test]
    fn individual_flags_are_independent() {
        let mut flags = Flags::EMPTY;

        for flag in Flag::ALL {
            flags.set(flag, true);
            assert!(flags.contains(flag));
        }
        assert_eq!(flags.bits(), FLAGS_ACTIVE_MASK);

        flags.set(Flag::Negative, false);
        assert!(!flags.contains(Flag::Negative));
        assert!(flags.contains(Flag::Zero));
        assert!(flags.contains(Flag::Error));
    }
}
