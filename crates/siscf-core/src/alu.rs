//! Combinational arithmetic unit.
//!
//! The ALU is a pure function of `(op, operand1, operand2)`. It never
//! remembers a request; the engine decides which register receives the
//! result and on which cycle.

use crate::execute::FlagsUpdate;

/// Arithmetic operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AluOp {
    /// Idle selector. Requesting it takes the error path.
    None = 0,
    /// `operand1 + operand2`.
    Add = 1,
    /// `operand1 - operand2`.
    Sub = 2,
    /// Reserved selector without an implementation; takes the error path.
    Mul = 3,
    /// `operand1 + 1`.
    Inc = 4,
    /// `operand1 - 1`.
    Dec = 5,
}

impl AluOp {
    /// Decodes a raw selector value.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Add),
            2 => Some(Self::Sub),
            3 => Some(Self::Mul),
            4 => Some(Self::Inc),
            5 => Some(Self::Dec),
            _ => None,
        }
    }
}

/// Result and flag effect of one ALU evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    /// Computed value; `0` when the operation is unsupported.
    pub value: i32,
    /// Flag update the engine applies on commit.
    pub flags: FlagsUpdate,
}

impl AluOutput {
    /// Returns `true` when the ALU rejected the operation.
    ///
    /// The engine must not write `value` to a destination in that case.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.flags, FlagsUpdate::Error)
    }
}

/// Evaluates `op` over two signed 32-bit operands with wrapping arithmetic.
///
/// `INC`/`DEC` ignore `rhs`. Only ZERO and NEGATIVE are produced; CARRY and
/// OVERFLOW are never written by the ALU.
#[must_use]
pub const fn evaluate(op: AluOp, lhs: i32, rhs: i32) -> AluOutput {
    let value = match op {
        AluOp::Add => lhs.wrapping_add(rhs),
        AluOp::Sub => lhs.wrapping_sub(rhs),
        AluOp::Inc => lhs.wrapping_add(1),
        AluOp::Dec => lhs.wrapping_sub(1),
        AluOp::None | AluOp::Mul => {
            return AluOutput {
                value: 0,
                flags: FlagsUpdate::Error,
            }
        }
    };

    AluOutput {
        value,
        flags: FlagsUpdate::from_result(value),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::{evaluate, AluOp};
    use crate::execute::FlagsUpdate;

    #[rstest]
    #[case(AluOp::Add, 2, 3, 5)]
    #[case(AluOp::Add, -3, 5, 2)]
    #[case(AluOp::Add, i32::MAX, 1, i32::MIN)]
    #[case(AluOp::Sub, 2, 3, -1)]
    #[case(AluOp::Sub, i32::MIN, 1, i32::MAX)]
    #[case(AluOp::Inc, -1, 99, 0)]
    #[case(AluOp::Dec, 0, 99, -1)]
    fn defined_operations_compute_wrapping_results(
        #[case] op: AluOp,
        #[case] lhs: i32,
        #[case] rhs: i32,
        #[case] expected: i32,
    ) {
        let out = evaluate(op, lhs, rhs);
        assert_eq!(out.value, expected);
        assert_eq!(out.flags, FlagsUpdate::from_result(expected));
        assert!(!out.is_error());
    }

    #[rstest]
    #[case(AluOp::None)]
    #[case(AluOp::Mul)]
    fn unsupported_operations_raise_error_and_zero_result(#[case] op: AluOp) {
        let out = evaluate(op, 7, 6);
        assert_eq!(out.value, 0);
        assert_eq!(out.flags, FlagsUpdate::Error);
        assert!(out.is_error());
    }

    #[test]
    fn sub_to_zero_is_not_negative() {
        let out = evaluate(AluOp::Sub, 9, 9);
        assert_eq!(
            out.flags,
            FlagsUpdate::ZeroNegative {
                zero: true,
                negative: false
            }
        );
    }

    #[test]
    fn selector_decode_covers_defined_values() {
        for raw in 0_u8..=5 {
            let op = AluOp::from_u8(raw).expect("defined selector");
            assert_eq!(op as u8, raw);
        }
        assert_eq!(AluOp::from_u8(6), None);
    }

    proptest! {
        #[test]
        fn add_flags_track_wrapped_result(a in any::<i32>(), b in any::<i32>()) {
            let out = evaluate(AluOp::Add, a, b);
            let wrapped = a.wrapping_add(b);
            prop_assert_eq!(out.value, wrapped);
            prop_assert_eq!(
                out.flags,
                FlagsUpdate::ZeroNegative { zero: wrapped == 0, negative: wrapped < 0 }
            );
        }

        #[test]
        fn sub_flags_track_wrapped_result(a in any::<i32>(), b in any::<i32>()) {
            let out = evaluate(AluOp::Sub, a, b);
            let wrapped = a.wrapping_sub(b);
            prop_assert_eq!(out.value, wrapped);
            prop_assert_eq!(
                out.flags,
                FlagsUpdate::ZeroNegative { zero: a == b, negative: wrapped < 0 }
            );
        }
    }
}
