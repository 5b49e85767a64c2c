//! `ActorGate`: the owning actor's control handles, attached to a port at
//! creation time so the send pipeline can honor that actor's lifecycle
//! instead of running unconditionally on whichever task calls `send`.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::sync::Notify;

// Layer 3: Internal module imports
use crate::actor::metrics::ActorMetrics;
use crate::actor::state::ActorState;
use crate::error::{Result, RuntimeError};

type ErrorHook = Arc<dyn Fn(String) + Send + Sync>;

/// A clone of a single actor's `state`/`resume_notify`/`metrics`/error-hook
/// handles, held by every `Port<T>` that actor owns.
///
/// A port with no gate (never attached to an actor, as in most unit tests)
/// runs its pipeline unconditionally; this is the common case exercised
/// directly against `Port::create`.
#[derive(Clone)]
pub(crate) struct ActorGate {
    state: Arc<Mutex<ActorState>>,
    resume_notify: Arc<Notify>,
    metrics: Arc<ActorMetrics>,
    on_error: Arc<Mutex<Option<ErrorHook>>>,
}

impl ActorGate {
    pub(crate) fn new(
        state: Arc<Mutex<ActorState>>,
        resume_notify: Arc<Notify>,
        metrics: Arc<ActorMetrics>,
        on_error: Arc<Mutex<Option<ErrorHook>>>,
    ) -> Self {
        Self {
            state,
            resume_notify,
            metrics,
            on_error,
        }
    }

    /// Block while the owning actor is `Paused`; fail with
    /// [`RuntimeError::InvalidState`] if it's `Stopped` or `Error`.
    /// Returns immediately otherwise.
    pub(crate) async fn wait_or_fail(&self, operation: &str) -> Result<()> {
        loop {
            let notified = self.resume_notify.notified();
            {
                let state = self.state.lock();
                match &*state {
                    ActorState::Paused(_) => {}
                    ActorState::Stopped | ActorState::Error(_) => {
                        return Err(RuntimeError::invalid_state(operation, state.to_string()));
                    }
                    _ => return Ok(()),
                }
            }
            notified.await;
        }
    }

    /// Record a pipeline failure against the owning actor: tallies it,
    /// transitions the actor to `Error(message)`, and invokes the
    /// registered error hook, if any.
    pub(crate) fn record_failure(&self, message: String) {
        self.metrics.record_failed();
        *self.state.lock() = ActorState::Error(message.clone());
        self.resume_notify.notify_waiters();
        let hook = self.on_error.lock().clone();
        if let Some(hook) = hook {
            hook(message);
        }
    }
}
