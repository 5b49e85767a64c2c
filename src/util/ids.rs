//! Identifier types for actors, workflows, and ports.

// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

/// Unique identifier for an [`crate::actor::Actor`].
///
/// # Example
/// ```rust
/// use portflow::util::ActorId;
///
/// let id1 = ActorId::new();
/// let id2 = ActorId::new();
/// assert_ne!(id1, id2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Generate a fresh v4 actor id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID as an actor id.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a [`crate::workflow::WorkflowManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowId(Uuid);

impl WorkflowId {
    /// Generate a fresh v4 workflow id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID as a workflow id.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WorkflowId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a [`crate::supervisor::SupervisorActor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupervisorId(Uuid);

impl SupervisorId {
    /// Generate a fresh v4 supervisor id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SupervisorId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SupervisorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generate a port id matching the `port-<16 hex chars>` pattern.
///
/// Unlike actor/workflow ids, port ids are not UUIDs: the source describes
/// them as a short hex suffix, so this uses 8 random bytes hex-encoded
/// rather than a full UUID.
///
/// # Example
/// ```rust
/// use portflow::util::new_port_id;
///
/// let id = new_port_id();
/// assert!(id.starts_with("port-"));
/// assert_eq!(id.len(), "port-".len() + 16);
/// ```
pub fn new_port_id() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut hex = String::with_capacity(16);
    for byte in bytes {
        hex.push_str(&format!("{byte:02x}"));
    }
    format!("port-{hex}")
}
