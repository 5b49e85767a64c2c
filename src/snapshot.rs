//! `ActorStateSnapshot`: an opaque, persistable view of an actor.
//!
//! This crate only defines the value and can produce it from a live
//! [`crate::actor::Actor`] — it owns no storage format, no versioning
//! migration, and no persistence backend.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorState, MetricsSnapshot};
use crate::port::ErasedPort;
use crate::util::ActorId;

/// The current version of the [`ActorStateSnapshot`] shape. A storage
/// layer that persists snapshots uses this to decide whether a migration
/// is needed; this crate never reads it back.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One port's identity and occupancy, as seen from the outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortSummary {
    /// The port's name.
    pub name: String,
    /// The Rust type name of the port's element type.
    pub element_type_name: String,
    /// Number of envelopes currently queued.
    pub len: usize,
}

/// A point-in-time, serializable view of an [`Actor`].
///
/// `custom_state` is an escape hatch for a scripted or otherwise
/// dynamically-behaving actor to attach arbitrary state this crate has no
/// opinion about; it is `None` for actors built purely from ports,
/// handlers, rules, and adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorStateSnapshot {
    /// The actor's stable id.
    pub actor_id: ActorId,
    /// The actor's name at snapshot time.
    pub actor_name: String,
    /// The actor's lifecycle state at snapshot time.
    pub state: ActorState,
    /// Every port the actor owns.
    pub ports: Vec<PortSummary>,
    /// A summary of the actor's metrics at snapshot time.
    pub metrics: MetricsSnapshot,
    /// Opaque, crate-agnostic extra state a storage layer may want to
    /// round-trip alongside the snapshot.
    pub custom_state: Option<Value>,
    /// Shape version, for a storage layer's own migrations.
    pub version: u32,
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

impl ActorStateSnapshot {
    /// Capture `actor`'s current state, ports, and metrics.
    pub fn capture(actor: &Actor) -> Self {
        Self::capture_with_custom_state(actor, None)
    }

    /// Capture `actor`, attaching `custom_state` verbatim.
    pub fn capture_with_custom_state(actor: &Actor, custom_state: Option<Value>) -> Self {
        let ports = actor
            .ports_summary()
            .into_iter()
            .map(|(name, element_type_name, len)| PortSummary {
                name,
                element_type_name: element_type_name.to_string(),
                len,
            })
            .collect();
        Self {
            actor_id: actor.id(),
            actor_name: actor.name(),
            state: actor.state(),
            ports,
            metrics: actor.metrics().snapshot(),
            custom_state,
            version: SNAPSHOT_VERSION,
            timestamp: Utc::now(), //        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortKind;

    #[test]
    fn test_capture_includes_ports_and_state() {
        let actor = Actor::new(None, Some("worker".to_string()));
        actor
            .create_port::<u32>("in", PortKind::Input, 8)
            .unwrap();
        let snapshot = ActorStateSnapshot::capture(&actor);
        assert_eq!(snapshot.actor_name, "worker");
        assert_eq!(snapshot.state, ActorState::Initialized);
        assert_eq!(snapshot.ports.len(), 1);
        assert_eq!(snapshot.ports[0].name, "in");
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    }

    #[test]
    fn test_capture_with_custom_state_roundtrips_through_json() {
        let actor = Actor::new(None, None);
        let custom = serde_json::json!({"script_cursor": 42});
        let snapshot = ActorStateSnapshot::capture_with_custom_state(&actor, Some(custom.clone()));
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: ActorStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.custom_state, Some(custom));
    }
}
