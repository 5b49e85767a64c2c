//! Message handlers applied on a port's send pipeline or a connection relay.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::error::Result;
use crate::message::PortValue;

/// A transformation applied to a message of type `T` within a port's send
/// pipeline or a connection's relay pipeline.
///
/// Handlers run synchronously in the producer's task (or the routing
/// task's), but may suspend: the trait is `async` so a handler can do I/O
/// or call out to another actor via request/reply without blocking the
/// executor thread.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use portflow::error::Result;
/// use portflow::port::MessageHandler;
///
/// struct Uppercase;
///
/// #[async_trait]
/// impl MessageHandler<String> for Uppercase {
///     async fn handle(&self, msg: String) -> Result<String> {
///         Ok(msg.to_uppercase())
///     }
/// }
/// ```
#[async_trait]
pub trait MessageHandler<T: PortValue>: Send + Sync {
    /// Apply this handler to `msg`, returning the (possibly transformed)
    /// message or a [`crate::error::RuntimeError::Validation`] rejection.
    async fn handle(&self, msg: T) -> Result<T>;
}

/// Wrap a synchronous closure as a [`MessageHandler`].
///
/// Most handlers in practice are pure transformations (uppercase a string,
/// clamp a number); this avoids writing a one-off struct and `impl` block
/// for each one.
///
/// # Example
///
/// ```rust
/// use portflow::port::handler_fn;
///
/// let handler = handler_fn(|msg: String| Ok(msg.to_uppercase()));
/// ```
pub fn handler_fn<T, F>(f: F) -> Arc<dyn MessageHandler<T>>
where
    T: PortValue,
    F: Fn(T) -> Result<T> + Send + Sync + 'static,
{
    struct FnHandler<T, F> {
        f: F,
        _marker: std::marker::PhantomData<T>,
    }

    #[async_trait]
    impl<T, F> MessageHandler<T> for FnHandler<T, F>
    where
        T: PortValue,
        F: Fn(T) -> Result<T> + Send + Sync + 'static,
    {
        async fn handle(&self, msg: T) -> Result<T> {
            (self.f)(msg)
        }
    }

    Arc::new(FnHandler {
        f,
        _marker: std::marker::PhantomData,
    })
}
