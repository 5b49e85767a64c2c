//! Protocol adapters: a port's own encode/decode pipeline, and a
//! connection's cross-type bridge.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::error::Result;
use crate::message::PortValue;

/// A `Port<T>`'s own encode/decode step.
///
/// Applied on send as `decode(encode(msg))`. The default blanket behavior
/// ports fall back to when no adapter is installed is plain identity;
/// an adapter that only overrides `decode` (e.g. to normalize a value on
/// the way out) still sees the result of `encode` first.
#[async_trait]
pub trait ProtocolAdapter<T: PortValue>: Send + Sync {
    /// Encode the outgoing value. Identity by default.
    async fn encode(&self, input: T) -> Result<T> {
        Ok(input)
    }

    /// Decode the (possibly encoded) value. Identity by default.
    async fn decode(&self, input: T) -> Result<T> {
        Ok(input)
    }
}

/// A `PortConnection<IN, OUT>`'s optional cross-type bridge.
///
/// Distinct from [`ProtocolAdapter`]: a connection's adapter converts
/// between two *different* port element types directly, rather than
/// round-tripping a single type through encode/decode.
#[async_trait]
pub trait ProtocolBridge<IN, OUT>: Send + Sync
where
    IN: PortValue,
    OUT: PortValue,
{
    /// Whether this bridge is able to convert `IN` to `OUT` right now.
    fn can_handle(&self) -> bool {
        true
    }

    /// Convert `input` directly into `OUT`.
    async fn bridge(&self, input: IN) -> Result<OUT>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;
    impl ProtocolAdapter<String> for Noop {}

    #[tokio::test]
    async fn test_default_adapter_is_identity() {
        let adapter = Noop;
        let encoded = adapter.encode("hi".to_string()).await.unwrap();
        let decoded = adapter.decode(encoded).await.unwrap();
        assert_eq!(decoded, "hi");
    }

    struct Trim;

    #[async_trait]
    impl ProtocolAdapter<String> for Trim {
        async fn decode(&self, input: String) -> Result<String> {
            Ok(input.trim().to_string())
        }
    }

    #[tokio::test]
    async fn test_adapter_can_override_decode_only() {
        let adapter = Trim;
        let encoded = adapter.encode("  hi  ".to_string()).await.unwrap();
        let decoded = adapter.decode(encoded).await.unwrap();
        assert_eq!(decoded, "hi");
    }

    struct IntToString;

    #[async_trait]
    impl ProtocolBridge<i32, String> for IntToString {
        async fn bridge(&self, input: i32) -> Result<String> {
            Ok(input.to_string())
        }
    }

    #[tokio::test]
    async fn test_bridge_converts_across_types() {
        let bridge = IntToString;
        assert!(bridge.can_handle());
        assert_eq!(bridge.bridge(42).await.unwrap(), "42");
    }
}
