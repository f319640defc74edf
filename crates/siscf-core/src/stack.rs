//! Stack unit: full-descending stack in memory, SP addressing the next free word.

use crate::api::BusRequest;
use crate::state::RegisterFile;

/// One stack operation requested by an instruction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackRequest {
    /// Write the value at SP, then decrement SP.
    Push(u32),
    /// Increment SP, then read the word at the new SP. Data arrives next clock.
    Pop,
}

impl StackRequest {
    /// Updates SP in `regs` and returns the bus transaction to drive.
    ///
    /// SP wraps modulo 2^32.
    #[must_use]
    pub const fn drive(self, regs: &mut RegisterFile) -> BusRequest {
        match self {
            Self::Push(value) => {
                let sp = regs.sp();
                regs.set_sp(sp.wrapping_sub(1));
                BusRequest::write(sp, value)
            }
            Self::Pop => {
                let sp = regs.sp().wrapping_add(1);
                regs.set_sp(sp);
                BusRequest::read(sp)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::StackRequest;
    use crate::api::{BusDirection, BusRequest};
    use crate::state::RegisterFile;

    #[test]
    fn push_writes_at_sp_then_decrements() {
        let mut regs = RegisterFile::default();
        regs.set_sp(0x100);
        let request = StackRequest::Push(7).drive(&mut regs);
        assert_eq!(request, BusRequest::write(0x100, 7));
        assert_eq!(regs.sp(), 0xFF);
    }

    #[test]
    fn pop_increments_then_reads() {
        let mut regs = RegisterFile::default();
        regs.set_sp(0xFF);
        let request = StackRequest::Pop.drive(&mut regs);
        assert_eq!(request.address, 0x100);
        assert_eq!(request.direction, BusDirection::Read);
        assert_eq!(regs.sp(), 0x100);
    }

    #[test]
    fn sp_wraps_at_both_ends() {
        let mut regs = RegisterFile::default();
        let _ = StackRequest::Push(1).drive(&mut regs);
        assert_eq!(regs.sp(), u32::MAX);
        let request = StackRequest::Pop.drive(&mut regs);
        assert_eq!(request.address, 0);
        assert_eq!(regs.sp(), 0);
    }

    proptest! {
        #[test]
        fn pop_reads_the_word_push_wrote(sp in any::<u32>(), value in any::<u32>()) {
            let mut regs = RegisterFile::default();
            regs.set_sp(sp);
            let pushed = StackRequest::Push(value).drive(&mut regs);
            let popped = StackRequest::Pop.drive(&mut regs);
            prop_assert_eq!(pushed.address, popped.address);
            prop_assert_eq!(regs.sp(), sp);
        }
    }
}
