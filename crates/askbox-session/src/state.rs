//! Request phase tracking for the ask flow.
//!
//! At most one answer request is in flight at a time:
//! - Idle -> Pending (question accepted, request started)
//! - Pending -> Idle (request resolved, success or failure)
//!
//! There is no error state; every resolution returns to Idle. A session
//! reset forces the phase back to Idle regardless of a live request.

use std::fmt;

/// Whether an answer request is currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AskPhase {
    /// No request in flight. Submissions are accepted.
    Idle,
    /// One request outstanding. Submissions are ignored.
    Pending,
}

impl fmt::Display for AskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskPhase::Idle => write!(f, "Idle"),
            AskPhase::Pending => write!(f, "Pending"),
        }
    }
}

impl AskPhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &AskPhase) -> bool {
        matches!(
            (self, target),
            (AskPhase::Idle, AskPhase::Pending) | (AskPhase::Pending, AskPhase::Idle)
        )
    }

    /// Whether a request is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self, AskPhase::Pending)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(AskPhase::Idle.to_string(), "Idle");
        assert_eq!(AskPhase::Pending.to_string(), "Pending");
    }

    #[test]
    fn test_valid_transitions() {
        assert!(AskPhase::Idle.can_transition_to(&AskPhase::Pending));
        assert!(AskPhase::Pending.can_transition_to(&AskPhase::Idle));
    }

    #[test]
    fn test_invalid_transitions() {
        // Cannot transition to self.
        assert!(!AskPhase::Idle.can_transition_to(&AskPhase::Idle));
        assert!(!AskPhase::Pending.can_transition_to(&AskPhase::Pending));
    }

    #[test]
    fn test_is_pending() {
        assert!(!AskPhase::Idle.is_pending());
        assert!(AskPhase::Pending.is_pending());
    }
}
