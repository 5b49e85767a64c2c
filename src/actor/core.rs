//! `Actor`: a named, stateful owner of ports.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::metrics::ActorMetrics;
use super::state::ActorState;
use crate::error::{Result, RuntimeError};
use crate::message::PortValue;
use crate::port::gate::ActorGate;
use crate::port::{ErasedPort, Port, PortKind};
use crate::util::ActorId;

/// A port plus the (type-erased) closure that can spawn its consumer task.
struct PortEntry {
    port: Arc<dyn ErasedPort>,
    spawn_consumer: Arc<dyn Fn() -> Option<JoinHandle<()>> + Send + Sync>,
}

type ErrorHook = Arc<dyn Fn(String) + Send + Sync>;

struct ActorInner {
    id: ActorId,
    name: Mutex<String>,
    state: Arc<Mutex<ActorState>>,
    resume_notify: Arc<Notify>,
    disposed: AtomicBool,
    ports: DashMap<String, PortEntry>,
    consumer_tasks: Mutex<HashMap<String, JoinHandle<()>>>,
    metrics: Arc<ActorMetrics>,
    error_hook: Arc<Mutex<Option<ErrorHook>>>,
}

/// A lifecycle-managed owner of [`Port`]s.
///
/// `Actor` is itself a cheap-clone handle (an `Arc` around its shared
/// state), the same pattern `Port<T>` uses: a `WorkflowManager` holds
/// actors by value in its `ActorId -> Actor` map and that's the only copy
/// that matters, but nothing stops other code from holding a clone.
///
/// There is no user-implemented "business logic" trait here: an actor's
/// behavior is entirely the handlers, rules, and adapters attached to its
/// ports. An actor simply supervises those ports' lifecycles and
/// aggregates their metrics.
///
/// # Example
///
/// ```rust
/// use portflow::actor::Actor;
/// use portflow::port::PortKind;
///
/// # tokio_test::block_on(async {
/// let actor = Actor::new(None, Some("uppercaser".to_string()));
/// let port = actor.create_port::<String>("in", PortKind::Input, 16).unwrap();
/// actor.start().unwrap();
/// actor.send("in", "hello".to_string()).await.unwrap();
/// # let _ = port;
/// # });
/// ```
#[derive(Clone)]
pub struct Actor {
    inner: Arc<ActorInner>,
}

impl Actor {
    /// Construct an actor, `Initialized`, with no ports.
    pub fn new(id: Option<ActorId>, name: Option<String>) -> Self {
        let id = id.unwrap_or_default();
        Self {
            inner: Arc::new(ActorInner {
                id,
                name: Mutex::new(name.unwrap_or_else(|| id.to_string())),
                state: Arc::new(Mutex::new(ActorState::Initialized)),
                resume_notify: Arc::new(Notify::new()),
                disposed: AtomicBool::new(false),
                ports: DashMap::new(),
                consumer_tasks: Mutex::new(HashMap::new()),
                metrics: Arc::new(ActorMetrics::new()),
                error_hook: Arc::new(Mutex::new(None)),
            }),
        }
    }

    /// Register a callback invoked (with the failure message) whenever a
    /// port pipeline failure moves this actor to `Error`.
    ///
    /// Replaces any previously registered hook. Takes effect immediately
    /// for ports already created, since the hook is reached through a
    /// shared handle rather than copied into each port at creation time.
    pub fn on_error<F>(&self, hook: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        *self.inner.error_hook.lock() = Some(Arc::new(hook));
    }

    /// This actor's stable id.
    pub fn id(&self) -> ActorId {
        self.inner.id
    }

    /// This actor's current (mutable) name.
    pub fn name(&self) -> String {
        self.inner.name.lock().clone()
    }

    /// Rename this actor.
    pub fn set_name(&self, name: impl Into<String>) {
        *self.inner.name.lock() = name.into();
    }

    /// A snapshot of the current lifecycle state.
    pub fn state(&self) -> ActorState {
        self.inner.state.lock().clone()
    }

    /// This actor's metrics handle.
    pub fn metrics(&self) -> Arc<ActorMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    /// Create a new, uniquely-named port.
    ///
    /// Errors with [`RuntimeError::DuplicateName`] if this actor already
    /// has a port under `name`.
    pub fn create_port<T: PortValue>(
        &self,
        name: impl Into<String>,
        kind: PortKind,
        capacity: usize,
    ) -> Result<Port<T>> {
        let name = name.into();
        if self.inner.ports.contains_key(&name) {
            return Err(RuntimeError::DuplicateName(name));
        }
        let port = Port::<T>::create(name.clone(), kind, capacity);
        let entry = self.build_port_entry(&port, kind);
        self.inner.ports.insert(name, entry);
        Ok(port)
    }

    /// Recover a previously created port by name and element type.
    ///
    /// Returns `None` if no port exists under `name`, or if one does but
    /// was created with a different element type.
    pub fn get_port<T: PortValue>(&self, name: &str) -> Option<Port<T>> {
        let entry = self.inner.ports.get(name)?;
        entry.port.as_any().downcast_ref::<Port<T>>().cloned()
    }

    /// `(name, element type name, queue length)` for every port, for
    /// `ActorStateSnapshot`.
    pub fn ports_summary(&self) -> Vec<(String, &'static str, usize)> {
        self.inner
            .ports
            .iter()
            .map(|entry| {
                let port = &entry.value().port;
                (port.name().to_string(), port.element_type_name(), port.len())
            })
            .collect()
    }

    /// Send `msg` on the named port. Requires `state() == Running`.
    pub async fn send<T: PortValue>(&self, port_name: &str, msg: T) -> Result<()> {
        if !self.inner.state.lock().is_running() {
            let state = self.inner.state.lock().to_string();
            return Err(RuntimeError::invalid_state("send", state));
        }
        let port = self
            .get_port::<T>(port_name)
            .ok_or_else(|| RuntimeError::NotFound(port_name.to_string()))?;
        port.send(msg).await
    }

    fn build_port_entry<T: PortValue>(&self, port: &Port<T>, kind: PortKind) -> PortEntry {
        // Every port gets a gate, not just `Input` ports: an `Output` port
        // is a legitimate `PortConnection` target (see the transformer
        // "mid" port pattern in `workflow/`), and its handlers must honor
        // this actor's lifecycle the same way an `Input` port's do.
        port.set_gate(ActorGate::new(
            Arc::clone(&self.inner.state),
            Arc::clone(&self.inner.resume_notify),
            Arc::clone(&self.inner.metrics),
            Arc::clone(&self.inner.error_hook),
        ));
        let erased: Arc<dyn ErasedPort> = Arc::new(port.clone());
        let spawn_consumer: Arc<dyn Fn() -> Option<JoinHandle<()>> + Send + Sync> =
            if kind == PortKind::Input {
                let port = port.clone();
                let state = Arc::clone(&self.inner.state);
                let resume_notify = Arc::clone(&self.inner.resume_notify);
                let metrics = Arc::clone(&self.inner.metrics);
                let port_name = ErasedPort::name(&port).to_string();
                let type_name = std::any::type_name::<T>();
                Arc::new(move || {
                    let rx = port.take_receiver()?;
                    Some(tokio::spawn(Self::run_consumer(
                        rx,
                        Arc::clone(&state),
                        Arc::clone(&resume_notify),
                        Arc::clone(&metrics),
                        port_name.clone(),
                        type_name,
                    )))
                })
            } else {
                Arc::new(|| None)
            };
        PortEntry {
            port: erased,
            spawn_consumer,
        }
    }

    /// One input port's consumer task.
    ///
    /// Handlers already ran on the producer side during `send`: this
    /// loop only dequeues, accounts queue-residency as the processing
    /// duration, and enforces the lifecycle's dequeue policy (block while
    /// `Paused`, exit on `Stopped`/`Error`).
    async fn run_consumer(
        mut rx: tokio::sync::mpsc::Receiver<crate::message::Envelope<impl PortValue>>,
        state: Arc<Mutex<ActorState>>,
        resume_notify: Arc<Notify>,
        metrics: Arc<ActorMetrics>,
        port_name: String,
        type_name: &'static str,
    ) {
        loop {
            Self::wait_while_paused(&state, &resume_notify).await;
            if matches!(*state.lock(), ActorState::Stopped | ActorState::Error(_)) {
                break;
            }
            let envelope = match rx.recv().await {
                Some(envelope) => envelope,
                None => break,
            };
            metrics.record_received(&port_name, envelope.priority);
            let elapsed = (Utc::now() - envelope.enqueued_at)
                .to_std()
                .unwrap_or_default();
            metrics.record_processed(type_name, elapsed);
            debug!(port = %port_name, ty = type_name, "consumer dequeued envelope");
        }
    }

    async fn wait_while_paused(state: &Arc<Mutex<ActorState>>, resume_notify: &Arc<Notify>) {
        loop {
            let notified = resume_notify.notified();
            if !matches!(*state.lock(), ActorState::Paused(_)) {
                return;
            }
            notified.await;
        }
    }

    /// `Initialized`/`Stopped` -> `Running`, spawning a consumer task per
    /// input port that doesn't already have one. Idempotent from `Running`.
    /// A no-op after `dispose`.
    pub fn start(&self) -> Result<()> {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return Ok(());
        }
        {
            let mut state = self.inner.state.lock();
            match &*state {
                ActorState::Running => return Ok(()),
                ActorState::Initialized | ActorState::Stopped => {}
                other => return Err(RuntimeError::invalid_state("start", other.to_string())),
            }
            *state = ActorState::Running;
        }
        let mut tasks = self.inner.consumer_tasks.lock();
        for entry in self.inner.ports.iter() {
            if tasks.contains_key(entry.key()) {
                continue;
            }
            if let Some(handle) = (entry.value().spawn_consumer)() {
                tasks.insert(entry.key().clone(), handle);
            }
        }
        debug!(actor = %self.inner.id, "actor started");
        Ok(())
    }

    /// Any non-disposed state -> `Stopped`. Aborts and clears consumer
    /// tasks; ports remain open.
    pub fn stop(&self) -> Result<()> {
        *self.inner.state.lock() = ActorState::Stopped;
        self.inner.resume_notify.notify_waiters();
        let mut tasks = self.inner.consumer_tasks.lock();
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
        debug!(actor = %self.inner.id, "actor stopped");
        Ok(())
    }

    /// `Running` -> `Paused(reason)`.
    pub fn pause(&self, reason: impl Into<String>) -> Result<()> {
        let mut state = self.inner.state.lock();
        if !matches!(*state, ActorState::Running) {
            return Err(RuntimeError::invalid_state("pause", state.to_string()));
        }
        *state = ActorState::Paused(reason.into());
        Ok(())
    }

    /// `Paused` -> `Running`.
    pub fn resume(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        if !matches!(*state, ActorState::Paused(_)) {
            return Err(RuntimeError::invalid_state("resume", state.to_string()));
        }
        *state = ActorState::Running;
        drop(state);
        self.inner.resume_notify.notify_waiters();
        Ok(())
    }

    /// `stop()` then dispose every port and clear all collections.
    /// Idempotent; subsequent `start()` becomes a no-op.
    pub fn dispose(&self) -> Result<()> {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.stop()?;
        for entry in self.inner.ports.iter() {
            entry.value().port.dispose();
        }
        self.inner.ports.clear();
        warn!(actor = %self.inner.id, "actor disposed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{handler_fn, PortKind};
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_new_actor_is_initialized() {
        let actor = Actor::new(None, None);
        assert_eq!(actor.state(), ActorState::Initialized);
    }

    #[test]
    fn test_create_port_duplicate_name_fails() {
        let actor = Actor::new(None, None);
        actor
            .create_port::<u32>("in", PortKind::Input, 4)
            .unwrap();
        let err = actor.create_port::<u32>("in", PortKind::Input, 4).unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateName(_)));
    }

    #[test]
    fn test_get_port_wrong_type_is_none() {
        let actor = Actor::new(None, None);
        actor
            .create_port::<u32>("in", PortKind::Input, 4)
            .unwrap();
        assert!(actor.get_port::<String>("in").is_none());
        assert!(actor.get_port::<u32>("in").is_some());
    }

    #[tokio::test]
    async fn test_send_requires_running() {
        let actor = Actor::new(None, None);
        actor
            .create_port::<u32>("in", PortKind::Input, 4)
            .unwrap();
        let err = actor.send("in", 1u32).await.unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidState { .. }));

        actor.start().unwrap();
        actor.send("in", 1u32).await.unwrap();
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let actor = Actor::new(None, None);
        actor.start().unwrap();
        actor.start().unwrap();
        assert_eq!(actor.state(), ActorState::Running);
    }

    #[test]
    fn test_pause_requires_running() {
        let actor = Actor::new(None, None);
        let err = actor.pause("manual").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_pause_then_resume() {
        let actor = Actor::new(None, None);
        actor.start().unwrap();
        actor.pause("manual").unwrap();
        assert!(matches!(actor.state(), ActorState::Paused(_)));
        actor.resume().unwrap();
        assert_eq!(actor.state(), ActorState::Running);
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent_and_disables_start() {
        let actor = Actor::new(None, None);
        actor.start().unwrap();
        actor.dispose().unwrap();
        actor.dispose().unwrap();
        actor.start().unwrap();
        assert_eq!(actor.state(), ActorState::Stopped);
    }

    #[tokio::test]
    async fn test_consumer_task_drains_and_records_metrics() {
        let actor = Actor::new(None, Some("worker".to_string()));
        actor.create_port::<u32>("in", PortKind::Input, 4).unwrap();
        actor.start().unwrap();
        actor.send("in", 1u32).await.unwrap();
        actor.send("in", 2u32).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(actor.metrics().messages_received(), 2);
        assert_eq!(actor.metrics().messages_processed(), 2);
    }

    #[tokio::test]
    async fn test_paused_actor_blocks_port_handler_until_resumed() {
        let actor = Actor::new(None, None);
        let port = actor
            .create_port::<u32>("in", PortKind::Input, 4)
            .unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        port.add_handler(handler_fn(move |v: u32| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
            Ok(v)
        }));
        actor.start().unwrap();
        actor.pause("backoff").unwrap();

        let port_clone = port.clone();
        let send_task = tokio::spawn(async move { port_clone.send(1u32).await });

        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        actor.resume().unwrap();
        send_task.await.unwrap().unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handler_failure_sets_error_and_invokes_hook() {
        let actor = Actor::new(None, None);
        let port = actor
            .create_port::<u32>("in", PortKind::Input, 4)
            .unwrap();
        port.add_handler(handler_fn(|_: u32| {
            Err(RuntimeError::Validation("bad value".to_string()))
        }));
        let hook_seen = Arc::new(Mutex::new(None));
        let hook_seen_clone = Arc::clone(&hook_seen);
        actor.on_error(move |message| {
            *hook_seen_clone.lock() = Some(message);
        });
        actor.start().unwrap();

        let err = port.send(1u32).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Validation(_)));
        assert!(matches!(actor.state(), ActorState::Error(_)));
        assert_eq!(actor.metrics().messages_failed(), 1);
        assert_eq!(
            hook_seen.lock().as_deref(),
            Some("validation failed: bad value")
        );
    }

    #[tokio::test]
    async fn test_port_send_rejected_after_actor_enters_error() {
        let actor = Actor::new(None, None);
        let port = actor
            .create_port::<u32>("in", PortKind::Input, 4)
            .unwrap();
        port.add_handler(handler_fn(|_: u32| {
            Err(RuntimeError::Validation("boom".to_string()))
        }));
        actor.start().unwrap();
        let err = port.send(1u32).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Validation(_)));

        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert!(matches!(actor.state(), ActorState::Error(_)));
        // A further send against the now-Error actor is rejected before
        // ever reaching the handler.
        let err = port.send(2u32).await.unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidState { .. }));
    }
}
