//! `Port<T>`, the typed handle actors and connections actually use.

// Layer 1: Standard library imports
use std::any::Any;
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, watch};

// Layer 3: Internal module imports
use super::adapter::ProtocolAdapter;
use super::core::{ErasedPort, PortKind};
use super::gate::ActorGate;
use super::handler::MessageHandler;
use super::rule::ConversionRule;
use crate::error::{Result, RuntimeError, SendFailure};
use crate::message::{Envelope, PortValue};
use crate::util::new_port_id;

struct PortInner<T: PortValue> {
    id: String,
    name: String,
    kind: PortKind,
    capacity: usize,
    sender: mpsc::Sender<Envelope<T>>,
    receiver: Mutex<Option<mpsc::Receiver<Envelope<T>>>>,
    handlers: RwLock<Vec<Arc<dyn MessageHandler<T>>>>,
    rules: RwLock<Vec<Arc<dyn ConversionRule<T, T>>>>,
    adapter: RwLock<Option<Arc<dyn ProtocolAdapter<T>>>>,
    gate: RwLock<Option<ActorGate>>,
}

impl<T: PortValue> fmt::Debug for PortInner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortInner")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("capacity", &self.capacity)
            .field("handlers", &self.handlers.read().len())
            .field("adapter", &self.adapter.read().is_some())
            .finish()
    }
}

/// A named, typed message queue owned by an [`crate::actor::Actor`].
///
/// `Port<T>` is a cheap-clone handle (an `Arc` around its shared state),
/// the same way the rest of this crate treats its routing primitives: any
/// number of callers can hold a `Port<T>` and call `send` concurrently.
///
/// # Pipeline
///
/// `send` runs, in order: the handler chain (each may transform or reject
/// the message), then the adapter's `encode` followed by `decode` (identity
/// unless an adapter is installed), then enqueues the result.
///
/// # Example
///
/// ```rust
/// use portflow::port::{Port, PortKind};
///
/// # tokio_test::block_on(async {
/// let port = Port::<String>::create("inbox", PortKind::Input, 8);
/// port.send("hello".to_string()).await.unwrap();
/// # });
/// ```
#[derive(Clone)]
pub struct Port<T: PortValue> {
    inner: Arc<PortInner<T>>,
}

impl<T: PortValue> fmt::Debug for Port<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Port").field(&self.inner).finish()
    }
}

impl<T: PortValue> Port<T> {
    /// Create a port with a bounded queue of `capacity` envelopes.
    pub fn create(name: impl Into<String>, kind: PortKind, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            inner: Arc::new(PortInner {
                id: new_port_id(),
                name: name.into(),
                kind,
                capacity: capacity.max(1),
                sender,
                receiver: Mutex::new(Some(receiver)),
                handlers: RwLock::new(Vec::new()),
                rules: RwLock::new(Vec::new()),
                adapter: RwLock::new(None),
                gate: RwLock::new(None),
            }),
        }
    }

    /// Attach the owning actor's control handles.
    ///
    /// Crate-internal: called once by `Actor::create_port`, for every port
    /// kind, so `apply_pipeline` can gate on that actor's lifecycle
    /// regardless of whether this port is ever dequeued by a consumer task
    /// (an `Output` port is only ever a `PortConnection` target, never
    /// consumed directly, but still belongs to an actor whose `Paused`
    /// state must hold off its handlers).
    pub(crate) fn set_gate(&self, gate: ActorGate) {
        *self.inner.gate.write() = Some(gate);
    }

    /// This port's generated id.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// This port's configured queue capacity.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Append a handler to the send pipeline.
    pub fn add_handler(&self, handler: Arc<dyn MessageHandler<T>>) {
        self.inner.handlers.write().push(handler);
    }

    /// Append a same-type conversion rule, applied after handlers and
    /// before the adapter. Unlike a `PortConnection`'s rule chain, this
    /// chain's applicability is re-checked only when rules are added, not
    /// per message.
    pub fn add_rule(&self, rule: Arc<dyn ConversionRule<T, T>>) {
        self.inner.rules.write().push(rule);
    }

    /// Install (replacing any existing) the adapter for this port.
    pub fn set_adapter(&self, adapter: Arc<dyn ProtocolAdapter<T>>) {
        *self.inner.adapter.write() = Some(adapter);
    }

    /// Take ownership of the underlying receiver.
    ///
    /// Crate-internal: called exactly once, by whoever spawns this port's
    /// consumer task or the routing
    /// task of a connection that reads from this port. Returns `None` if
    /// already taken.
    pub(crate) fn take_receiver(&self) -> Option<mpsc::Receiver<Envelope<T>>> {
        self.inner.receiver.lock().take()
    }

    /// Close the port: drop the receiver so pending and future sends fail.
    /// Idempotent.
    pub fn dispose(&self) {
        self.inner.receiver.lock().take();
    }

    /// Run a payload through the handler chain, rule chain, and adapter.
    ///
    /// Gated on the owning actor's lifecycle, if this port has one: blocks
    /// while that actor is `Paused`, fails while it's `Stopped`/`Error`. A
    /// pipeline failure tallies `messages_failed`, moves the owning actor
    /// to `Error`, and invokes its error hook.
    async fn apply_pipeline(&self, value: T) -> Result<T> {
        let gate = self.inner.gate.read().clone();
        if let Some(gate) = &gate {
            gate.wait_or_fail("send").await?;
        }
        match self.run_pipeline(value).await {
            Ok(value) => Ok(value),
            Err(err) => {
                if let Some(gate) = &gate {
                    gate.record_failure(err.to_string());
                }
                Err(err)
            }
        }
    }

    async fn run_pipeline(&self, mut value: T) -> Result<T> {
        let handlers: Vec<_> = self.inner.handlers.read().clone();
        for handler in &handlers {
            value = handler.handle(value).await?;
        }
        let rules: Vec<_> = self.inner.rules.read().clone();
        if let Some(rule) = rules.iter().find(|r| r.can_handle()) {
            value = rule.convert(value).await?;
        }
        let adapter = self.inner.adapter.read().clone();
        if let Some(adapter) = adapter {
            value = adapter.encode(value).await?;
            value = adapter.decode(value).await?;
        }
        Ok(value)
    }

    /// Run the pipeline and enqueue `payload`, waiting for queue space.
    ///
    /// Returns [`RuntimeError::Send`] with [`SendFailure::Closed`] if this
    /// port has been disposed.
    pub async fn send(&self, payload: T) -> Result<()> {
        let processed = self.apply_pipeline(payload).await?;
        let envelope = Envelope::new(processed);
        self.inner
            .sender
            .send(envelope)
            .await
            .map_err(|_| RuntimeError::Send(SendFailure::Closed))
    }

    /// Like [`Port::send`], but aborts with [`SendFailure::Cancelled`] if
    /// `cancel` fires before queue space frees up.
    ///
    /// Used by `PortConnection`'s routing task so a shutdown doesn't wait
    /// forever on a full downstream queue.
    pub async fn send_cancellable(
        &self,
        payload: T,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<()> {
        let processed = self.apply_pipeline(payload).await?;
        let envelope = Envelope::new(processed);
        tokio::select! {
            biased;
            _ = cancel.changed() => Err(RuntimeError::Send(SendFailure::Cancelled)),
            res = self.inner.sender.send(envelope) => {
                res.map_err(|_| RuntimeError::Send(SendFailure::Closed))
            }
        }
    }
}

impl<T: PortValue> ErasedPort for Port<T> {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn kind(&self) -> PortKind {
        self.inner.kind
    }

    fn element_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn len(&self) -> usize {
        self.inner
            .capacity
            .saturating_sub(self.inner.sender.capacity())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dispose(&self) {
        Port::dispose(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::handler_fn;

    #[tokio::test]
    async fn test_send_and_take_receiver() {
        let port = Port::<String>::create("in", PortKind::Input, 4);
        port.send("hi".to_string()).await.unwrap();
        let mut rx = port.take_receiver().unwrap();
        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.payload, "hi");
    }

    #[tokio::test]
    async fn test_take_receiver_only_once() {
        let port = Port::<u32>::create("in", PortKind::Input, 4);
        assert!(port.take_receiver().is_some());
        assert!(port.take_receiver().is_none());
    }

    #[tokio::test]
    async fn test_handler_pipeline_runs_on_send() {
        let port = Port::<String>::create("in", PortKind::Input, 4);
        port.add_handler(handler_fn(|m: String| Ok(m.to_uppercase())));
        port.send("hi".to_string()).await.unwrap();
        let mut rx = port.take_receiver().unwrap();
        assert_eq!(rx.recv().await.unwrap().payload, "HI");
    }

    #[tokio::test]
    async fn test_send_after_dispose_fails() {
        let port = Port::<u32>::create("in", PortKind::Input, 1);
        drop(port.take_receiver());
        let err = port.send(1).await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Send(SendFailure::Closed)
        ));
    }

    #[tokio::test]
    async fn test_len_tracks_queue_depth() {
        let port = Port::<u32>::create("in", PortKind::Input, 4);
        assert_eq!(port.len(), 0);
        port.send(1).await.unwrap();
        assert_eq!(port.len(), 1);
    }

    #[tokio::test]
    async fn test_send_cancellable_aborts_on_cancel() {
        let port = Port::<u32>::create("in", PortKind::Input, 1);
        port.send(1).await.unwrap(); // fill the single slot
        let (tx, mut rx) = watch::channel(false);
        let port_clone = port.clone();
        let handle = tokio::spawn(async move { port_clone.send_cancellable(2, &mut rx).await });
        tx.send(true).unwrap();
        let result = handle.await.unwrap();
        assert!(matches!(
            result,
            Err(RuntimeError::Send(SendFailure::Cancelled))
        ));
    }
}
