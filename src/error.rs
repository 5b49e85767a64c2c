//! Crate-wide error taxonomy.
//!
//! The runtime expresses failures as *kinds*, not as one type per component:
//! a handler rejection on a `Port`, a mismatched `PortConnection`, and
//! a `WorkflowManager::start` failure are all `RuntimeError` values, just
//! with different variants. This keeps propagation uniform from the
//! send-path all the way up through the workflow.
//!
//! # Example
//!
//! ```rust
//! use portflow::error::RuntimeError;
//!
//! let err = RuntimeError::invalid_state("send", "Paused");
//! assert!(err.to_string().contains("Paused"));
//!
//! let err = RuntimeError::PortConnection {
//!     source_id: "port-aaaa".to_string(),
//!     target_id: "port-bbbb".to_string(),
//!     message: "String cannot convert to Int".to_string(),
//! };
//! assert!(err.to_string().contains("port-aaaa"));
//! ```

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Crate-wide error kind.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A handler, adapter, or conversion rule rejected a message.
    ///
    /// Non-fatal to the port: the port remains `Open` and the sender (or
    /// routing task) observes this error for the one message involved.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Incompatible endpoint types discovered at `connect`/`start` time.
    #[error("port connection {source_id} -> {target_id} is invalid: {message}")]
    PortConnection {
        /// Id of the source port.
        source_id: String,
        /// Id of the target port.
        target_id: String,
        /// Human-readable description of the failing check.
        message: String,
    },

    /// A send failed for a transport reason (closed queue, cancellation).
    #[error("send failed: {0}")]
    Send(#[from] SendFailure),

    /// An operation was attempted in a state that forbids it.
    #[error("cannot {operation} while in state {state}")]
    InvalidState {
        /// The operation that was rejected.
        operation: String,
        /// The state the component was in at the time.
        state: String,
    },

    /// A registry insert collided with an id already present.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// An actor already owns a port under this name.
    #[error("duplicate port name: {0}")]
    DuplicateName(String),

    /// A lookup (actor, port, connection, spec) found nothing.
    #[error("not found: {0}")]
    NotFound(String),
}

impl RuntimeError {
    /// Build an [`RuntimeError::InvalidState`] from an operation name and
    /// the offending state's `Display` form.
    pub fn invalid_state(operation: impl Into<String>, state: impl Into<String>) -> Self {
        Self::InvalidState {
            operation: operation.into(),
            state: state.into(),
        }
    }

    /// Build a [`RuntimeError::PortConnection`] error.
    pub fn port_connection(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::PortConnection {
            source_id: source_id.into(),
            target_id: target_id.into(),
            message: message.into(),
        }
    }
}

/// Transport-level reasons a `send` can fail, distinct from `Validation`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    /// The port (or the connection's target port) has been disposed.
    #[error("queue is closed")]
    Closed,

    /// The send was cancelled while suspended on a full queue.
    #[error("send was cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = RuntimeError::Validation("bad payload".to_string());
        assert_eq!(err.to_string(), "validation failed: bad payload");
    }

    #[test]
    fn test_port_connection_display() {
        let err = RuntimeError::port_connection("port-a", "port-b", "type mismatch");
        let msg = err.to_string();
        assert!(msg.contains("port-a"));
        assert!(msg.contains("port-b"));
        assert!(msg.contains("type mismatch"));
    }

    #[test]
    fn test_invalid_state_display() {
        let err = RuntimeError::invalid_state("connect", "Running");
        assert!(err.to_string().contains("connect"));
        assert!(err.to_string().contains("Running"));
    }

    #[test]
    fn test_send_closed_from() {
        let err: RuntimeError = SendFailure::Closed.into();
        assert!(matches!(err, RuntimeError::Send(SendFailure::Closed)));
        assert_eq!(err.to_string(), "send failed: queue is closed");
    }

    #[test]
    fn test_duplicate_id_display() {
        let err = RuntimeError::DuplicateId("actor-1".to_string());
        assert_eq!(err.to_string(), "duplicate id: actor-1");
    }

    #[test]
    fn test_not_found_display() {
        let err = RuntimeError::NotFound("port-xyz".to_string());
        assert_eq!(err.to_string(), "not found: port-xyz");
    }
}
