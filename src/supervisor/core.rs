//! `SupervisorActor`: a dynamic registry of actors supporting hot-swap.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

// Layer 3: Internal module imports
use super::descriptor::TypeDescriptor;
use super::state::SupervisorState;
use crate::actor::{Actor, ActorState};
use crate::error::{Result, RuntimeError};
use crate::util::{ActorId, SupervisorId};

struct SupervisorInner {
    id: SupervisorId,
    state: Mutex<SupervisorState>,
    /// Serializes register/unregister/hot-swap so no two callers can race
    /// on the same `ActorId` across the two maps below.
    registry_lock: Mutex<()>,
    actors: DashMap<ActorId, Actor>,
    descriptors: DashMap<ActorId, TypeDescriptor>,
}

/// Registers actors, tracks each one's port shape, and can swap a
/// registered actor for a structurally compatible replacement without
/// disturbing the rest of the registry.
///
/// A `SupervisorActor` has no ports of its own and doesn't route messages;
/// it only manages other actors' lifecycles.
///
/// # Example
///
/// ```rust
/// use portflow::actor::Actor;
/// use portflow::port::PortKind;
/// use portflow::supervisor::SupervisorActor;
///
/// let supervisor = SupervisorActor::new(None);
/// supervisor.start().unwrap();
///
/// let worker = Actor::new(None, Some("worker".to_string()));
/// worker.create_port::<u32>("in", PortKind::Input, 8).unwrap();
/// let worker_id = worker.id();
/// supervisor.register_actor(worker).unwrap();
///
/// assert!(supervisor.get_actor(worker_id).is_some());
/// ```
#[derive(Clone)]
pub struct SupervisorActor {
    inner: Arc<SupervisorInner>,
}

impl SupervisorActor {
    /// Construct a supervisor, `Initialized`, with an empty registry.
    pub fn new(id: Option<SupervisorId>) -> Self {
        Self {
            inner: Arc::new(SupervisorInner {
                id: id.unwrap_or_default(),
                state: Mutex::new(SupervisorState::Initialized),
                registry_lock: Mutex::new(()),
                actors: DashMap::new(),
                descriptors: DashMap::new(),
            }),
        }
    }

    /// This supervisor's stable id.
    pub fn id(&self) -> SupervisorId {
        self.inner.id
    }

    /// A snapshot of the current lifecycle state.
    pub fn state(&self) -> SupervisorState {
        *self.inner.state.lock()
    }

    fn ensure_running(&self, operation: &str) -> Result<()> {
        let state = *self.inner.state.lock();
        if state.is_running() {
            Ok(())
        } else {
            Err(RuntimeError::invalid_state(operation, state.to_string()))
        }
    }

    /// `Initialized`/`Stopped` -> `Running`. Idempotent from `Running`.
    pub fn start(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        *state = SupervisorState::Running;
        Ok(())
    }

    /// -> `Stopped`. Does not touch registered actors; see
    /// [`SupervisorActor::stop_all_actors`] for that.
    pub fn stop(&self) -> Result<()> {
        *self.inner.state.lock() = SupervisorState::Stopped;
        Ok(())
    }

    /// Register `actor` under its own id, recording its current port shape.
    ///
    /// Errors with [`RuntimeError::DuplicateId`] if this id is already
    /// registered. Requires `Running`.
    pub fn register_actor(&self, actor: Actor) -> Result<()> {
        self.ensure_running("register_actor")?;
        let _guard = self.inner.registry_lock.lock();
        let id = actor.id();
        if self.inner.actors.contains_key(&id) {
            return Err(RuntimeError::DuplicateId(id.to_string()));
        }
        let descriptor = TypeDescriptor::of(&actor);
        self.inner.actors.insert(id, actor);
        self.inner.descriptors.insert(id, descriptor);
        debug!(actor = %id, "actor registered");
        Ok(())
    }

    /// Remove `id` from the registry. Does not stop the actor. Requires
    /// `Running`.
    pub fn unregister_actor(&self, id: ActorId) -> Result<Actor> {
        self.ensure_running("unregister_actor")?;
        let _guard = self.inner.registry_lock.lock();
        self.inner.descriptors.remove(&id);
        let (_, actor) = self
            .inner
            .actors
            .remove(&id)
            .ok_or_else(|| RuntimeError::NotFound(id.to_string()))?;
        debug!(actor = %id, "actor unregistered");
        Ok(actor)
    }

    /// Replace the actor registered under `old_id` with `new_actor`,
    /// keeping `old_id` as the registry key.
    ///
    /// Returns `Ok(false)` without touching anything if `old_id` isn't
    /// registered, or if `new_actor`'s port shape doesn't match the
    /// recorded one for `old_id`. Otherwise stops the old actor, swaps it
    /// in, and restarts the new one if the old one was `Running`. Requires
    /// `Running`.
    pub fn hot_swap_actor(&self, old_id: ActorId, new_actor: Actor) -> Result<bool> {
        self.ensure_running("hot_swap_actor")?;
        let _guard = self.inner.registry_lock.lock();

        let Some(recorded) = self.inner.descriptors.get(&old_id).map(|d| d.clone()) else {
            return Ok(false);
        };
        if TypeDescriptor::of(&new_actor) != recorded {
            return Ok(false);
        }
        let old_actor = self
            .inner
            .actors
            .get(&old_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| RuntimeError::NotFound(old_id.to_string()))?;

        let was_running = matches!(old_actor.state(), ActorState::Running);
        old_actor.stop()?;

        self.inner.actors.insert(old_id, new_actor.clone());
        if was_running {
            new_actor.start()?;
        }
        info!(actor = %old_id, "actor hot-swapped");
        Ok(true)
    }

    /// Look up a registered actor by id.
    pub fn get_actor(&self, id: ActorId) -> Option<Actor> {
        self.inner.actors.get(&id).map(|e| e.value().clone())
    }

    /// All registered actors.
    pub fn get_all_actors(&self) -> Vec<Actor> {
        self.inner.actors.iter().map(|e| e.value().clone()).collect()
    }

    /// Every registered actor whose recorded port shape matches
    /// `descriptor`.
    pub fn get_actors_by_type(&self, descriptor: &TypeDescriptor) -> Vec<Actor> {
        self.inner
            .descriptors
            .iter()
            .filter(|e| e.value() == descriptor)
            .filter_map(|e| self.get_actor(*e.key()))
            .collect()
    }

    /// Start every registered actor. Requires `Running`.
    pub fn start_all_actors(&self) -> Result<()> {
        self.ensure_running("start_all_actors")?;
        for actor in self.inner.actors.iter() {
            actor.value().start()?;
        }
        Ok(())
    }

    /// Stop every registered actor. Requires `Running`.
    pub fn stop_all_actors(&self) -> Result<()> {
        self.ensure_running("stop_all_actors")?;
        for actor in self.inner.actors.iter() {
            actor.value().stop()?;
        }
        Ok(())
    }

    /// Stop and dispose every registered actor, then clear the registry.
    /// Idempotent.
    pub fn dispose(&self) -> Result<()> {
        if matches!(*self.inner.state.lock(), SupervisorState::Stopped) && self.inner.actors.is_empty() {
            return Ok(());
        }
        for actor in self.inner.actors.iter() {
            actor.value().dispose()?;
        }
        self.inner.actors.clear();
        self.inner.descriptors.clear();
        *self.inner.state.lock() = SupervisorState::Stopped;
        Ok(())
    }
}
