//! Envelope wrapping a port payload with routing/metrics metadata.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use super::priority::MessagePriority;
use super::value::PortValue;
use crate::util::new_port_id;

/// A payload plus the metadata `ActorMetrics` and routing need.
///
/// Ports queue `Envelope<T>`, not bare `T`: a port is an ordered bounded
/// queue of `T`, but `ActorMetrics` also tallies per-priority counts and
/// times each handler invocation, both of which need a place to live that
/// isn't the payload itself.
///
/// # Example
///
/// ```rust
/// use portflow::message::{Envelope, MessagePriority};
///
/// let envelope = Envelope::new("hello".to_string());
/// assert_eq!(envelope.priority, MessagePriority::Normal);
///
/// let urgent = Envelope::with_priority(42u32, MessagePriority::High);
/// assert_eq!(urgent.priority, MessagePriority::High);
/// ```
#[derive(Debug, Clone)]
pub struct Envelope<T: PortValue> {
    /// Unique id for this envelope (not the payload), used for tracing.
    pub id: String,
    /// The actual message payload.
    pub payload: T,
    /// Priority metadata, metrics-only.
    pub priority: MessagePriority,
    /// When this envelope was enqueued.
    pub enqueued_at: DateTime<Utc>,
}

impl<T: PortValue> Envelope<T> {
    /// Wrap a payload with default (Normal) priority.
    pub fn new(payload: T) -> Self {
        Self::with_priority(payload, MessagePriority::Normal)
    }

    /// Wrap a payload with an explicit priority.
    pub fn with_priority(payload: T, priority: MessagePriority) -> Self {
        Self {
            id: new_port_id(),
            payload,
            priority,
            enqueued_at: Utc::now(), //        }
    }

    /// Consume the envelope, returning just the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Map the payload through a conversion, keeping the envelope metadata.
    pub fn map<U: PortValue>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            id: self.id,
            payload: f(self.payload),
            priority: self.priority,
            enqueued_at: self.enqueued_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_new_defaults_to_normal() {
        let envelope = Envelope::new(1u32);
        assert_eq!(envelope.priority, MessagePriority::Normal);
    }

    #[test]
    fn test_envelope_with_priority() {
        let envelope = Envelope::with_priority("x".to_string(), MessagePriority::Critical);
        assert_eq!(envelope.priority, MessagePriority::Critical);
    }

    #[test]
    fn test_into_payload() {
        let envelope = Envelope::new(vec![1, 2, 3]);
        assert_eq!(envelope.into_payload(), vec![1, 2, 3]);
    }

    #[test]
    fn test_map_preserves_metadata() {
        let envelope = Envelope::with_priority(10i32, MessagePriority::High);
        let mapped = envelope.map(|v| v.to_string());
        assert_eq!(mapped.payload, "10");
        assert_eq!(mapped.priority, MessagePriority::High);
    }

    #[test]
    fn test_envelope_ids_unique() {
        let a = Envelope::new(1u8);
        let b = Envelope::new(1u8);
        assert_ne!(a.id, b.id);
    }
}
