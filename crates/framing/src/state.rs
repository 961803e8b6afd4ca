use serde::{Deserialize, Serialize};

/// Where a [`StreamFramer`](crate::StreamFramer) stands with respect to the
/// sentence it is building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FramingState {
    /// Waiting for a `$`. Every other byte is discarded.
    #[default]
    Idle,
    /// A `$` has been seen; bytes are retained until a terminator or the
    /// capacity is reached.
    Accumulating,
    /// A complete sentence sits in the buffer waiting to be taken.
    Ready,
    /// The buffer filled up before a terminator arrived. Only `reset` leaves
    /// this state.
    Saturated,
}

impl FramingState {
    /// Whether the framer refuses further bytes until the caller acts.
    pub fn is_blocked(self) -> bool {
        matches!(self, FramingState::Ready | FramingState::Saturated)
    }
}

impl std::fmt::Display for FramingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FramingState::Idle => "Idle",
            FramingState::Accumulating => "Accumulating",
            FramingState::Ready => "Ready",
            FramingState::Saturated => "Saturated",
        };
        f.write_str(s)
    }
}
