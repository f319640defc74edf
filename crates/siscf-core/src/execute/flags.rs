//! Flag update behaviors for different instruction classes.

use crate::state::{Flag, Flags};

/// Describes how the flag register changes when a step commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagsUpdate {
    /// No change to flags.
    #[default]
    None,
    /// Update ZERO and NEGATIVE, leave the rest alone.
    ZeroNegative {
        /// Zero flag.
        zero: bool,
        /// Negative flag.
        negative: bool,
    },
    /// Clear every flag, then raise ERROR.
    Error,
    /// Raise one flag.
    Set(Flag),
    /// Clear one flag.
    Clear(Flag),
}

impl FlagsUpdate {
    /// ZERO/NEGATIVE update derived from a signed result.
    #[must_use]
    pub const fn from_result(value: i32) -> Self {
        Self::ZeroNegative {
            zero: value == 0,
            negative: value < 0,
        }
    }

    /// Applies this update to `flags`.
    #[must_use]
    pub const fn apply(self, flags: Flags) -> Flags {
        match self {
            Self::None => flags,
            Self::ZeroNegative { zero, negative } => flags
                .with(Flag::Zero, zero)
                .with(Flag::Negative, negative),
            Self::Error => Flags::EMPTY.with(Flag::Error, true),
            Self::Set(flag) => flags.with(flag, true),
            Self::Clear(flag) => flags.with(flag, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FlagsUpdate;
    use crate::state::{Flag, Flags, FLAGS_ACTIVE_MASK};

    #[test]
    fn zero_negative_preserves_other_bits() {
        let before = Flags::EMPTY.with(Flag::Carry, true).with(Flag::Zero, true);
        let after = FlagsUpdate::from_result(-7).apply(before);

        assert!(after.contains(Flag::Carry));
        assert!(after.contains(Flag::Negative));
        assert!(!after.contains(Flag::Zero));
    }

    #[test]
    fn error_update_clears_everything_else() {
        let after = FlagsUpdate::Error.apply(Flags::from_bits(FLAGS_ACTIVE_MASK));
        assert_eq!(after, Flags::EMPTY.with(Flag::Error, true));
    }

    #[test]
    fn single_flag_updates_touch_one_bit() {
        let set = FlagsUpdate::Set(Flag::Carry).apply(Flags::EMPTY);
        assert_eq!(set.bits(), Flag::Carry.mask());

        let cleared = FlagsUpdate::Clear(Flag::Carry).apply(set.with(Flag::Error, true));
        assert_eq!(cleared.bits(), Flag::Error.mask());
    }
}
