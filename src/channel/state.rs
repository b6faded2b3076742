//! Channel lifecycle state machine.
//!
//! The channel moves strictly forward:
//!
//! ```text
//! Unopened -> Connecting -> Open -> Closed
//!                  |                  ^
//!                  +------------------+
//! ```
//!
//! Each forward transition happens at most once per session. `Closed` is
//! terminal and reachable from any non-terminal state; there is no
//! reconnection, so a closed channel ends the session.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// ChannelState
// ============================================================================

/// Lifecycle state of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No connection attempt has been made yet.
    Unopened,
    /// A connection attempt is in flight (or has failed with no retry).
    Connecting,
    /// The transport is connected; sends are permitted.
    Open,
    /// The transport has closed. Terminal.
    Closed,
}

impl ChannelState {
    /// Returns `true` if sends are permitted.
    #[inline]
    #[must_use]
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    /// Returns `true` if no further transitions can occur.
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }

    /// Returns `true` if the transition `self -> next` is legal.
    ///
    /// Legal transitions are the single forward step plus closing from
    /// any non-terminal state.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unopened, Self::Connecting)
                | (Self::Connecting, Self::Open)
                | (Self::Unopened | Self::Connecting | Self::Open, Self::Closed)
        )
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unopened => "unopened",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_legal() {
        assert!(ChannelState::Unopened.can_transition_to(ChannelState::Connecting));
        assert!(ChannelState::Connecting.can_transition_to(ChannelState::Open));
        assert!(ChannelState::Open.can_transition_to(ChannelState::Closed));
    }

    #[test]
    fn test_close_from_any_non_terminal_state() {
        assert!(ChannelState::Unopened.can_transition_to(ChannelState::Closed));
        assert!(ChannelState::Connecting.can_transition_to(ChannelState::Closed));
        assert!(ChannelState::Open.can_transition_to(ChannelState::Closed));
    }

    #[test]
    fn test_closed_is_terminal() {
        assert!(ChannelState::Closed.is_terminal());
        assert!(!ChannelState::Closed.can_transition_to(ChannelState::Open));
        assert!(!ChannelState::Closed.can_transition_to(ChannelState::Connecting));
        assert!(!ChannelState::Closed.can_transition_to(ChannelState::Closed));
    }

    #[test]
    fn test_no_backward_or_skipping_transitions() {
        assert!(!ChannelState::Unopened.can_transition_to(ChannelState::Open));
        assert!(!ChannelState::Open.can_transition_to(ChannelState::Connecting));
        assert!(!ChannelState::Connecting.can_transition_to(ChannelState::Unopened));
    }

    #[test]
    fn test_only_open_can_send() {
        assert!(ChannelState::Open.is_open());
        assert!(!ChannelState::Unopened.is_open());
        assert!(!ChannelState::Connecting.is_open());
        assert!(!ChannelState::Closed.is_open());
    }

    #[test]
    fn test_display() {
        assert_eq!(ChannelState::Unopened.to_string(), "unopened");
        assert_eq!(ChannelState::Open.to_string(), "open");
    }
}
