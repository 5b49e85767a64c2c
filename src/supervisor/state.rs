//! `SupervisorActor`'s own (minimal) lifecycle gate.

// Layer 1: Standard library imports
use std::fmt;

/// Whether a `SupervisorActor` currently accepts registry operations.
///
/// Unlike [`crate::actor::ActorState`] there is no `Paused` variant: a
/// supervisor either gates its registry or it doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// Constructed; registry operations are rejected until `start`.
    Initialized,
    /// Accepting register/unregister/hot-swap calls.
    Running,
    /// Stopped; registry operations are rejected until `start` again.
    Stopped,
}

impl SupervisorState {
    /// Whether registry operations are currently permitted.
    pub fn is_running(&self) -> bool {
        matches!(self, SupervisorState::Running)
    }
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupervisorState::Initialized => write!(f, "Initialized"),
            SupervisorState::Running => write!(f, "Running"),
            SupervisorState::Stopped => write!(f, "Stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_running() {
        assert!(!SupervisorState::Initialized.is_running());
        assert!(SupervisorState::Running.is_running());
        assert!(!SupervisorState::Stopped.is_running());
    }

    #[test]
    fn test_display() {
        assert_eq!(SupervisorState::Running.to_string(), "Running");
    }
}
