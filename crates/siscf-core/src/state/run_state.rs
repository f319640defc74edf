/// Progress of the boot-time reset sequence.
///
/// The sequence only moves forward: `Start -> AwaitVector -> Running` in
/// vectored mode, `Start -> Running` with a fixed start address. Only an
/// asserted reset line sends the core back to `Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ResetState {
    /// First reset cycle; nothing has been driven yet.
    #[default]
    Start,
    /// Vector address is on the bus; the start address arrives this cycle.
    AwaitVector,
    /// Reset finished; the engine fetches and executes.
    Running,
}

impl ResetState {
    /// Numeric sub-state as exposed to diagnostics (`0..=2`).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Start => 0,
            Self::AwaitVector => 1,
            Self::Running => 2,
        }
    }

    /// Returns `true` once the reset sequence has completed.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::ResetState;

    #[test]
    fn reset_state_defaults_to_start() {
        assert_eq!(ResetState::default(), ResetState::Start);
        assert!(!ResetState::default().is_running());
    }

    #[test]
    fn indices_advance_monotonically() {
        assert_eq!(ResetState::Start.index(), 0);
        assert_eq!(ResetState::AwaitVector.index(), 1);
        assert_eq!(ResetState::Running.index(), 2);
        assert!(ResetState::Running.is_running());
    }
}
