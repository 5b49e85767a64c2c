//! `WorkflowManager`: composes actors and routes messages between their
//! ports.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, error};

// Layer 3: Internal module imports
use super::erased::ErasedConnection;
use super::spec::ConnectionSpec;
use super::state::WorkflowState;
use crate::actor::Actor;
use crate::error::{Result, RuntimeError};
use crate::message::PortValue;
use crate::port::PortConnection;
use crate::util::{ActorId, WorkflowId};

type ConnectionFactoryFn =
    dyn Fn(&DashMap<ActorId, Actor>) -> Result<Arc<dyn ErasedConnection>> + Send + Sync;

struct WorkflowInner {
    id: WorkflowId,
    name: Mutex<String>,
    state: Mutex<WorkflowState>,
    disposed: AtomicBool,
    actors: DashMap<ActorId, Actor>,
    specs: Mutex<Vec<ConnectionSpec>>,
    factories: DashMap<ConnectionSpec, Arc<ConnectionFactoryFn>>,
    live: DashMap<ConnectionSpec, Arc<dyn ErasedConnection>>,
}

/// Composes [`Actor`]s into a dataflow graph and owns its start/stop
/// ordering.
///
/// Like [`Actor`] and [`crate::port::Port`], `WorkflowManager` is a
/// cheap-clone handle around shared state.
///
/// # Example
///
/// ```rust
/// use portflow::actor::Actor;
/// use portflow::port::PortKind;
/// use portflow::workflow::WorkflowManager;
///
/// # tokio_test::block_on(async {
/// let workflow = WorkflowManager::new(None, None);
///
/// let upstream = Actor::new(None, Some("upstream".to_string()));
/// upstream.create_port::<String>("out", PortKind::Output, 8).unwrap();
/// let downstream = Actor::new(None, Some("downstream".to_string()));
/// downstream.create_port::<String>("in", PortKind::Input, 8).unwrap();
///
/// let (up_id, down_id) = (upstream.id(), downstream.id());
/// workflow.add_actor(upstream).unwrap();
/// workflow.add_actor(downstream).unwrap();
/// workflow.connect::<String, String>(up_id, "out", down_id, "in").unwrap();
///
/// workflow.start().await.unwrap();
/// workflow.stop().await.unwrap();
/// # });
/// ```
#[derive(Clone)]
pub struct WorkflowManager {
    inner: Arc<WorkflowInner>,
}

impl WorkflowManager {
    /// Construct a workflow, `Initialized`, with no actors or connections.
    pub fn new(id: Option<WorkflowId>, name: Option<String>) -> Self {
        let id = id.unwrap_or_default();
        Self {
            inner: Arc::new(WorkflowInner {
                id,
                name: Mutex::new(name.unwrap_or_else(|| id.to_string())),
                state: Mutex::new(WorkflowState::Initialized),
                disposed: AtomicBool::new(false),
                actors: DashMap::new(),
                specs: Mutex::new(Vec::new()),
                factories: DashMap::new(),
                live: DashMap::new(),
            }),
        }
    }

    /// This workflow's stable id.
    pub fn id(&self) -> WorkflowId {
        self.inner.id
    }

    /// This workflow's current name.
    pub fn name(&self) -> String {
        self.inner.name.lock().clone()
    }

    /// A snapshot of the current lifecycle state.
    pub fn state(&self) -> WorkflowState {
        self.inner.state.lock().clone()
    }

    fn ensure_configurable(&self, operation: &str) -> Result<()> {
        let state = self.inner.state.lock();
        if state.is_configurable() {
            Ok(())
        } else {
            Err(RuntimeError::invalid_state(operation, state.to_string()))
        }
    }

    /// Add an actor. Only while `Initialized` or `Stopped`.
    ///
    /// Errors with [`RuntimeError::DuplicateId`] if an actor with this id
    /// is already present.
    pub fn add_actor(&self, actor: Actor) -> Result<()> {
        self.ensure_configurable("add_actor")?;
        if self.inner.actors.contains_key(&actor.id()) {
            return Err(RuntimeError::DuplicateId(actor.id().to_string()));
        }
        self.inner.actors.insert(actor.id(), actor);
        Ok(())
    }

    /// Record a connection between two actors' ports. Only while
    /// `Initialized` or `Stopped`.
    ///
    /// `IN`/`OUT` are resolved against each actor's ports at `start()`
    /// time, not here — the underlying `PortConnection` is cheap to build
    /// and gets rebuilt every time a workflow restarts. Instantiating with
    /// `IN = OUT = `[`crate::port::DynValue`] is the Any-typed fallback
    /// port: it works exactly like any other connection, as long as both
    /// actors expose a `Port<DynValue>` under the given names.
    pub fn connect<IN: PortValue, OUT: PortValue>(
        &self,
        source_actor_id: ActorId,
        source_port_name: impl Into<String>,
        target_actor_id: ActorId,
        target_port_name: impl Into<String>,
    ) -> Result<()> {
        self.ensure_configurable("connect")?;
        let source_port_name = source_port_name.into();
        let target_port_name = target_port_name.into();
        let spec = ConnectionSpec::new(
            source_actor_id,
            source_port_name.clone(),
            target_actor_id,
            target_port_name.clone(),
        );

        let factory: Arc<ConnectionFactoryFn> = Arc::new(move |actors| {
            let source_actor = actors.get(&source_actor_id).ok_or_else(|| {
                RuntimeError::NotFound(format!("actor {source_actor_id}"))
            })?;
            let target_actor = actors.get(&target_actor_id).ok_or_else(|| {
                RuntimeError::NotFound(format!("actor {target_actor_id}"))
            })?;
            let source_port = source_actor.get_port::<IN>(&source_port_name).ok_or_else(|| {
                RuntimeError::NotFound(format!(
                    "port '{source_port_name}' on actor {source_actor_id}"
                ))
            })?;
            let target_port = target_actor.get_port::<OUT>(&target_port_name).ok_or_else(|| {
                RuntimeError::NotFound(format!(
                    "port '{target_port_name}' on actor {target_actor_id}"
                ))
            })?;
            let connection = PortConnection::new(source_port, target_port);
            Ok(Arc::new(connection) as Arc<dyn ErasedConnection>)
        });

        self.inner.factories.insert(spec.clone(), factory);
        self.inner.specs.lock().push(spec);
        Ok(())
    }

    /// Remove a connection. Tears down its live routing task first if the
    /// workflow is currently `Running`.
    pub async fn disconnect(&self, spec: &ConnectionSpec) -> Result<()> {
        if let Some((_, live)) = self.inner.live.remove(spec) {
            live.stop_and_join().await?;
        }
        self.inner.factories.remove(spec);
        self.inner.specs.lock().retain(|s| s != spec);
        Ok(())
    }

    /// Start every actor, then build, validate, and start every recorded
    /// connection. Any failure transitions to `Error` and propagates.
    pub async fn start(&self) -> Result<()> {
        {
            let state = self.inner.state.lock();
            if matches!(*state, WorkflowState::Running) {
                return Ok(());
            }
            if !state.is_configurable() {
                return Err(RuntimeError::invalid_state("start", state.to_string()));
            }
        }

        for actor in self.inner.actors.iter() {
            actor.value().start()?;
        }

        let specs = self.inner.specs.lock().clone();
        for spec in &specs {
            if let Err(err) = self.start_connection(spec) {
                *self.inner.state.lock() = WorkflowState::Error(err.to_string());
                error!(workflow = %self.inner.id, %err, "workflow start failed");
                return Err(err);
            }
        }

        *self.inner.state.lock() = WorkflowState::Running;
        debug!(workflow = %self.inner.id, "workflow started");
        Ok(())
    }

    fn start_connection(&self, spec: &ConnectionSpec) -> Result<()> {
        let factory = self
            .inner
            .factories
            .get(spec)
            .ok_or_else(|| RuntimeError::NotFound(format!("connection factory for {spec:?}")))?
            .clone();
        let connection = factory(&self.inner.actors)?;
        connection.validate()?;
        connection.start()?;
        self.inner.live.insert(spec.clone(), connection);
        Ok(())
    }

    /// Stop-and-join every live connection, then stop every actor.
    ///
    /// Ordering is load-bearing: a connection's routing task must finish
    /// before its target actor's ports are touched, or a routing send can
    /// race a port dispose.
    pub async fn stop(&self) -> Result<()> {
        let live_specs: Vec<ConnectionSpec> =
            self.inner.live.iter().map(|entry| entry.key().clone()).collect();
        for spec in live_specs {
            if let Some((_, live)) = self.inner.live.remove(&spec) {
                live.stop_and_join().await?;
            }
        }
        for actor in self.inner.actors.iter() {
            actor.value().stop()?;
        }
        *self.inner.state.lock() = WorkflowState::Stopped;
        debug!(workflow = %self.inner.id, "workflow stopped");
        Ok(())
    }

    /// Pause every actor in turn. Routing tasks keep running — only each
    /// actor's own consumer tasks stop dequeuing.
    pub fn pause(&self, reason: impl Into<String>) -> Result<()> {
        let reason = reason.into();
        {
            let state = self.inner.state.lock();
            if !matches!(*state, WorkflowState::Running) {
                return Err(RuntimeError::invalid_state("pause", state.to_string()));
            }
        }
        for actor in self.inner.actors.iter() {
            actor.value().pause(reason.clone())?;
        }
        *self.inner.state.lock() = WorkflowState::Paused(reason);
        Ok(())
    }

    /// Resume every actor in turn.
    pub fn resume(&self) -> Result<()> {
        {
            let state = self.inner.state.lock();
            if !matches!(*state, WorkflowState::Paused(_)) {
                return Err(RuntimeError::invalid_state("resume", state.to_string()));
            }
        }
        for actor in self.inner.actors.iter() {
            actor.value().resume()?;
        }
        *self.inner.state.lock() = WorkflowState::Running;
        Ok(())
    }

    /// `stop()` (if not already `Stopped`) then dispose every actor.
    /// Idempotent.
    ///
    /// Callers that must not lose this cleanup to cancellation should
    /// spawn it (`tokio::spawn(workflow.dispose())`) and await the
    /// `JoinHandle` rather than awaiting the future directly: a spawned
    /// task keeps running even if its `JoinHandle` is dropped.
    pub async fn dispose(&self) -> Result<()> {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if !matches!(*self.inner.state.lock(), WorkflowState::Stopped) {
            self.stop().await?;
        }
        for actor in self.inner.actors.iter() {
            actor.value().dispose()?;
        }
        Ok(())
    }

    /// Look up an actor by id.
    pub fn get_actor(&self, id: ActorId) -> Option<Actor> {
        self.inner.actors.get(&id).map(|entry| entry.value().clone())
    }

    /// All actors currently in this workflow.
    pub fn get_actors(&self) -> Vec<Actor> {
        self.inner.actors.iter().map(|entry| entry.value().clone()).collect()
    }

    /// All recorded connection specs, in insertion order.
    pub fn get_connections(&self) -> Vec<ConnectionSpec> {
        self.inner.specs.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{handler_fn, PortKind};
    use std::sync::atomic::AtomicUsize;

    fn passthrough_workflow() -> (WorkflowManager, ActorId, ActorId) {
        let workflow = WorkflowManager::new(None, None);
        let upstream = Actor::new(None, Some("upstream".to_string()));
        upstream
            .create_port::<String>("out", PortKind::Output, 8)
            .unwrap();
        let downstream = Actor::new(None, Some("downstream".to_string()));
        downstream
            .create_port::<String>("in", PortKind::Input, 8)
            .unwrap();
        let (up_id, down_id) = (upstream.id(), downstream.id());
        workflow.add_actor(upstream).unwrap();
        workflow.add_actor(downstream).unwrap();
        (workflow, up_id, down_id)
    }

    #[test]
    fn test_add_actor_duplicate_id_fails() {
        let workflow = WorkflowManager::new(None, None);
        let actor = Actor::new(None, None);
        let clone = actor.clone();
        workflow.add_actor(actor).unwrap();
        let err = workflow.add_actor(clone).unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateId(_)));
    }

    #[tokio::test]
    async fn test_start_builds_and_runs_connection() {
        let (workflow, up_id, down_id) = passthrough_workflow();
        workflow
            .connect::<String, String>(up_id, "out", down_id, "in")
            .unwrap();
        workflow.start().await.unwrap();
        assert_eq!(workflow.state(), WorkflowState::Running);

        let upstream = workflow.get_actor(up_id).unwrap();
        upstream.send("out", "hello".to_string()).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let downstream = workflow.get_actor(down_id).unwrap();
        assert_eq!(downstream.metrics().messages_received(), 1);

        workflow.stop().await.unwrap();
        assert_eq!(workflow.state(), WorkflowState::Stopped);
    }

    #[tokio::test]
    async fn test_start_fails_on_missing_port() {
        let (workflow, up_id, down_id) = passthrough_workflow();
        workflow
            .connect::<String, String>(up_id, "does-not-exist", down_id, "in")
            .unwrap();
        let err = workflow.start().await.unwrap_err();
        assert!(matches!(err, RuntimeError::NotFound(_)));
        assert!(matches!(workflow.state(), WorkflowState::Error(_)));
    }

    #[tokio::test]
    async fn test_connect_rejected_while_running() {
        let (workflow, up_id, down_id) = passthrough_workflow();
        workflow
            .connect::<String, String>(up_id, "out", down_id, "in")
            .unwrap();
        workflow.start().await.unwrap();
        let err = workflow
            .connect::<String, String>(up_id, "out", down_id, "in")
            .unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_disconnect_while_running_stops_live_connection() {
        let (workflow, up_id, down_id) = passthrough_workflow();
        workflow
            .connect::<String, String>(up_id, "out", down_id, "in")
            .unwrap();
        workflow.start().await.unwrap();
        let spec = workflow.get_connections().remove(0);
        workflow.disconnect(&spec).await.unwrap();
        assert!(workflow.get_connections().is_empty());
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent() {
        let (workflow, up_id, down_id) = passthrough_workflow();
        workflow
            .connect::<String, String>(up_id, "out", down_id, "in")
            .unwrap();
        workflow.start().await.unwrap();
        workflow.dispose().await.unwrap();
        workflow.dispose().await.unwrap();
    }

    #[tokio::test]
    async fn test_pause_and_resume_workflow() {
        let (workflow, up_id, down_id) = passthrough_workflow();
        workflow
            .connect::<String, String>(up_id, "out", down_id, "in")
            .unwrap();
        workflow.start().await.unwrap();
        workflow.pause("maintenance").unwrap();
        let downstream = workflow.get_actor(down_id).unwrap();
        assert!(matches!(downstream.state(), crate::actor::ActorState::Paused(_)));
        workflow.resume().unwrap();
        assert_eq!(downstream.state(), crate::actor::ActorState::Running);
    }

    #[tokio::test]
    async fn test_paused_downstream_blocks_connection_routed_handler() {
        let (workflow, up_id, down_id) = passthrough_workflow();
        workflow
            .connect::<String, String>(up_id, "out", down_id, "in")
            .unwrap();

        let downstream = workflow.get_actor(down_id).unwrap();
        let in_port = downstream.get_port::<String>("in").unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        in_port.add_handler(handler_fn(move |m: String| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
            Ok(m)
        }));

        workflow.start().await.unwrap();
        downstream.pause("maintenance").unwrap();

        let upstream = workflow.get_actor(up_id).unwrap();
        upstream.send("out", "hi".to_string()).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        downstream.resume().unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
