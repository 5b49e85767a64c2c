//! The type-erased face of a port.

// Layer 1: Standard library imports
use std::any::Any;
use std::fmt;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Whether a port is wired as a connection's source or target.
///
/// Informational only — a port doesn't refuse to be used the "wrong" way,
/// but `Actor::create_port` records it so introspection (`ActorStateSnapshot`)
/// can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    /// Accepts messages from a `PortConnection` or from `Actor::send`.
    Input,
    /// Feeds messages to a `PortConnection`.
    Output,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortKind::Input => write!(f, "input"),
            PortKind::Output => write!(f, "output"),
        }
    }
}

/// Object-safe face of a `Port<T>`, stored in an actor's heterogeneous port
/// map as `Arc<dyn ErasedPort>`.
///
/// An actor's ports don't share a single element type, so the map can't be
/// `DashMap<String, Port<T>>` for a fixed `T`. Every `Port<T>` implements
/// this trait; `Actor::get_port::<T>(name)` downcasts back to the concrete
/// `Port<T>` via [`ErasedPort::as_any`].
pub trait ErasedPort: Any + Send + Sync + fmt::Debug {
    /// The port's name, unique within its owning actor.
    fn name(&self) -> &str;

    /// Whether this port is wired as a source or a target.
    fn kind(&self) -> PortKind;

    /// The name of the Rust type this port carries, for diagnostics and
    /// `ActorStateSnapshot`.
    fn element_type_name(&self) -> &'static str;

    /// Number of messages currently queued.
    fn len(&self) -> usize;

    /// Whether the port's queue is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upcast for downcasting back to a concrete `Port<T>`.
    fn as_any(&self) -> &dyn Any;

    /// Close the port, idempotent. Subsequent sends fail with
    /// `RuntimeError::Send(SendFailure::Closed)`.
    fn dispose(&self);
}
