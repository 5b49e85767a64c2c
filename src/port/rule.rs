//! Conversion rules bridging a `PortConnection`'s source and target types.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::error::Result;
use crate::message::PortValue;

/// One candidate conversion from `IN` to `OUT` within a connection's rule
/// chain.
///
/// A `PortConnection<IN, OUT>` may carry several rules; at relay time the
/// first rule whose [`can_handle`](ConversionRule::can_handle) returns
/// `true` performs the conversion. `can_handle` exists because `IN`/`OUT`
/// are already pinned by the connection's generic parameters — it lets a
/// rule opt out based on runtime state (a feature flag, a value range)
/// rather than type identity.
#[async_trait]
pub trait ConversionRule<IN, OUT>: Send + Sync
where
    IN: PortValue,
    OUT: PortValue,
{
    /// Whether this rule applies. Defaults to always-applicable.
    fn can_handle(&self) -> bool {
        true
    }

    /// Convert `input` into `OUT`.
    async fn convert(&self, input: IN) -> Result<OUT>;
}

/// Wrap a synchronous closure as a [`ConversionRule`] that always applies.
pub fn rule_fn<IN, OUT, F>(f: F) -> Arc<dyn ConversionRule<IN, OUT>>
where
    IN: PortValue,
    OUT: PortValue,
    F: Fn(IN) -> Result<OUT> + Send + Sync + 'static,
{
    struct FnRule<IN, OUT, F> {
        f: F,
        _marker: std::marker::PhantomData<(IN, OUT)>,
    }

    #[async_trait]
    impl<IN, OUT, F> ConversionRule<IN, OUT> for FnRule<IN, OUT, F>
    where
        IN: PortValue,
        OUT: PortValue,
        F: Fn(IN) -> Result<OUT> + Send + Sync + 'static,
    {
        async fn convert(&self, input: IN) -> Result<OUT> {
            (self.f)(input)
        }
    }

    Arc::new(FnRule {
        f,
        _marker: std::marker::PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rule_fn_converts() {
        let rule = rule_fn(|n: i32| Ok(n.to_string()));
        assert_eq!(rule.convert(7).await.unwrap(), "7");
    }

    #[tokio::test]
    async fn test_can_handle_default_true() {
        let rule = rule_fn(|n: i32| Ok(n.to_string()));
        assert!(rule.can_handle());
    }

    struct ConditionalRule;

    #[async_trait]
    impl ConversionRule<i32, String> for ConditionalRule {
        fn can_handle(&self) -> bool {
            false
        }

        async fn convert(&self, input: i32) -> Result<String> {
            Ok(input.to_string())
        }
    }

    #[test]
    fn test_can_handle_override() {
        let rule = ConditionalRule;
        assert!(!rule.can_handle());
    }
}
