//! Actor lifecycle state machine.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// An actor's lifecycle state.
///
/// Transitions: `Initialized -> start() -> Running` (idempotent from
/// `Running`); `stop()` from any non-disposed state -> `Stopped`;
/// `pause(reason)` only from `Running` -> `Paused`; `resume()` only from
/// `Paused` -> `Running`; `Error(message)` set on an unrecoverable
/// handler/send failure. There is no `Disposed` variant: disposal removes
/// the actor's ports and tasks but the actor's last observed state is
/// whatever it was before `dispose()` ran (typically `Stopped`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    /// Constructed, no consumer tasks running yet.
    Initialized,
    /// Consumer tasks are draining input ports.
    Running,
    /// Consumer tasks are alive but not dequeuing.
    Paused(String),
    /// Consumer tasks stopped; ports remain open.
    Stopped,
    /// An unrecoverable failure occurred; the actor requires `dispose`.
    Error(String),
}

impl ActorState {
    /// Whether `send` is permitted in this state.
    pub fn is_running(&self) -> bool {
        matches!(self, ActorState::Running)
    }
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorState::Initialized => write!(f, "Initialized"),
            ActorState::Running => write!(f, "Running"),
            ActorState::Paused(reason) => write!(f, "Paused({reason})"),
            ActorState::Stopped => write!(f, "Stopped"),
            ActorState::Error(message) => write!(f, "Error({message})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_running() {
        assert!(ActorState::Running.is_running());
        assert!(!ActorState::Initialized.is_running());
        assert!(!ActorState::Paused("backoff".to_string()).is_running());
    }

    #[test]
    fn test_display() {
        assert_eq!(ActorState::Initialized.to_string(), "Initialized");
        assert_eq!(
            ActorState::Paused("manual".to_string()).to_string(),
            "Paused(manual)"
        );
        assert_eq!(
            ActorState::Error("panic".to_string()).to_string(),
            "Error(panic)"
        );
    }
}
