//! Prelude module for convenient imports.
//!
//! Re-exports the types most callers need to build a workflow. Import this
//! module to get started quickly:
//!
//! ```rust
//! use portflow::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Core Runtime
//! - [`Actor`] - a named, lifecycle-managed owner of ports
//! - [`ActorState`] - an actor's lifecycle state
//! - [`ActorMetrics`] / [`MetricsSnapshot`] - per-actor counters and timing
//! - [`Port`] - a typed, bounded port with its own handler/rule pipeline
//! - [`PortKind`] - `Input` or `Output`
//! - [`PortConnection`] - a routing task between two ports
//! - [`DynValue`] - the Any-typed fallback port payload
//! - [`MessageHandler`] / [`handler_fn`] - a port's pre-send transformation
//! - [`ConversionRule`] / [`rule_fn`] - a candidate type conversion
//! - [`ProtocolAdapter`] / [`ProtocolBridge`] - encode/decode and cross-type
//!   bridging
//!
//! ## Composition
//! - [`WorkflowManager`] - composes actors and connections
//! - [`WorkflowState`] - a workflow's lifecycle state
//! - [`ConnectionSpec`] - the durable description of a wire
//! - [`SupervisorActor`] - dynamic actor registration and hot-swap
//! - [`TypeDescriptor`] - an actor's port shape, for hot-swap compatibility
//!
//! ## Configuration and Persistence
//! - [`RuntimeConfig`] / [`PortConfig`] - runtime-wide and per-port defaults
//! - [`ActorStateSnapshot`] - a persistable view of an actor
//!
//! ## Errors
//! - [`RuntimeError`] / [`Result`] - the crate-wide error taxonomy
//! - [`SendFailure`] - transport-level send failure reasons
//!
//! # Example
//!
//! ```rust
//! use portflow::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let actor = Actor::new(None, Some("worker".to_string()));
//! actor.create_port::<u32>("in", PortKind::Input, 16).unwrap();
//! actor.start().unwrap();
//! actor.send("in", 1u32).await.unwrap();
//! # });
//! ```

// Core runtime
pub use crate::actor::{Actor, ActorMetrics, ActorState, MetricsSnapshot};
pub use crate::port::{
    handler_fn, rule_fn, ConversionRule, DynValue, ErasedPort, MessageHandler, Port,
    PortConnection, PortKind, ProtocolAdapter, ProtocolBridge,
};

// Composition
pub use crate::supervisor::{SupervisorActor, TypeDescriptor};
pub use crate::workflow::{ConnectionSpec, WorkflowManager, WorkflowState};

// Configuration and persistence
pub use crate::config::{PortConfig, RuntimeConfig};
pub use crate::snapshot::ActorStateSnapshot;

// Errors
pub use crate::error::{Result, RuntimeError, SendFailure};

// Utilities
pub use crate::util::{ActorId, SupervisorId, WorkflowId};
