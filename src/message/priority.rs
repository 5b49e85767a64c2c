//! Message priority levels.
//!
//! Priority is metadata only: no priority preemption, no
//! scheduling fairness. `ActorMetrics` tallies messages per priority, but
//! ports always dequeue strictly FIFO.

/// Relative importance of a message, used only for metrics tallies.
///
/// # Example
///
/// ```rust
/// use portflow::message::MessagePriority;
///
/// assert!(MessagePriority::Critical > MessagePriority::High);
/// assert!(MessagePriority::High > MessagePriority::Normal);
/// assert!(MessagePriority::Normal > MessagePriority::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MessagePriority {
    /// Background processing, no delivery-order effect.
    Low = 0,
    /// Default priority.
    #[default]
    Normal = 1,
    /// Elevated priority, metrics-only distinction.
    High = 2,
    /// Highest priority, metrics-only distinction.
    Critical = 3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(MessagePriority::Critical > MessagePriority::High);
        assert!(MessagePriority::High > MessagePriority::Normal);
        assert!(MessagePriority::Normal > MessagePriority::Low);
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(MessagePriority::default(), MessagePriority::Normal);
    }
}
