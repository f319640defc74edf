use crate::api::{BusRequest, BusResponse, MemoryBus};

/// Inserts a fixed number of stall cycles before each new transaction.
///
/// A transaction is new when the request differs from the one presented on
/// the previous clock. Repeating a request that already completed does not
/// stall again.
#[derive(Debug, Clone)]
pub struct WaitStates<B> {
    inner: B,
    wait_cycles: u32,
    current: Option<BusRequest>,
    remaining: u32,
}

impl<B> WaitStates<B> {
    /// Wraps `inner`, stalling `wait_cycles` clocks per new transaction.
    #[must_use]
    pub const fn new(inner: B, wait_cycles: u32) -> Self {
        Self {
            inner,
            wait_cycles,
            current: None,
            remaining: 0,
        }
    }

    /// Configured stall count.
    #[must_use]
    pub const fn wait_cycles(&self) -> u32 {
        self.wait_cycles
    }

    /// Wrapped memory.
    #[must_use]
    pub const fn inner(&self) -> &B {
        &self.inner
    }

    /// Wrapped memory, mutably.
    pub const fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    /// Unwraps the adapter.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: MemoryBus> MemoryBus for WaitStates<B> {
    fn transfer(&mut self, request: &BusRequest) -> BusResponse {
        if self.current != Some(*request) {
            self.current = Some(*request);
            self.remaining = self.wait_cycles;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            return BusResponse::stalled();
        }
        self.inner.transfer(request)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::WaitStates;
    use crate::api::{BusRequest, MemoryBus};
    use crate::memory::FlatMemory;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    fn new_request_stalls_for_configured_cycles(#[case] waits: u32) {
        let memory = FlatMemory::with_image(4, [(1, 77)]).unwrap();
        let mut bus = WaitStates::new(memory, waits);
        let request = BusRequest::read(1);
        for _ in 0..waits {
            assert!(bus.transfer(&request).stall);
        }
        let response = bus.transfer(&request);
        assert!(!response.stall);
        assert_eq!(response.data_in, 77);
    }

    #[test]
    fn repeated_request_after_completion_does_not_stall() {
        let mut bus = WaitStates::new(FlatMemory::new(4), 2);
        let request = BusRequest::read(0);
        while bus.transfer(&request).stall {}
        assert!(!bus.transfer(&request).stall);
    }

    #[test]
    fn write_lands_only_after_stall_expires() {
        let mut bus = WaitStates::new(FlatMemory::new(4), 1);
        let write = BusRequest::write(2, 9);
        assert!(bus.transfer(&write).stall);
        assert_ne!(bus.inner().read(2), 9);
        assert!(!bus.transfer(&write).stall);
        assert_eq!(bus.inner().read(2), 9);
    }
}
