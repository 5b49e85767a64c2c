//! # portflow - Concurrent In-Process Actor/Dataflow Runtime
//!
//! A lightweight runtime for wiring typed, concurrent actors into dataflow
//! graphs: each actor owns named ports, ports carry any `Send + Debug`
//! payload through a bounded queue, and a `WorkflowManager` composes
//! actors by routing one actor's output port to another's input port.
//!
//! # Quick Start
//!
//! ```rust
//! use portflow::actor::Actor;
//! use portflow::port::PortKind;
//! use portflow::workflow::WorkflowManager;
//!
//! # tokio_test::block_on(async {
//! let upstream = Actor::new(None, Some("upstream".to_string()));
//! upstream.create_port::<String>("out", PortKind::Output, 16).unwrap();
//!
//! let downstream = Actor::new(None, Some("downstream".to_string()));
//! downstream.create_port::<String>("in", PortKind::Input, 16).unwrap();
//!
//! let (up_id, down_id) = (upstream.id(), downstream.id());
//!
//! let workflow = WorkflowManager::new(None, Some("pipeline".to_string()));
//! workflow.add_actor(upstream).unwrap();
//! workflow.add_actor(downstream).unwrap();
//! workflow
//!     .connect::<String, String>(up_id, "out", down_id, "in")
//!     .unwrap();
//!
//! workflow.start().await.unwrap();
//! let upstream = workflow.get_actor(up_id).unwrap();
//! upstream.send("out", "hello".to_string()).await.unwrap();
//! workflow.stop().await.unwrap();
//! # });
//! ```
//!
//! # Core Concepts
//!
//! - **Port**: a typed, bounded, ordered queue with an attached pipeline
//!   of handlers, conversion rules, and an optional protocol adapter. Two
//!   kinds: `Input` (an actor's own consumer task drains it) and `Output`
//!   (only ever a `PortConnection`'s source).
//! - **Actor**: a named, lifecycle-managed owner of ports. All business
//!   logic lives in the handlers/rules/adapters attached to its ports —
//!   `Actor` itself has no user-implemented trait to satisfy.
//! - **PortConnection**: a routing task from one port to another, with its
//!   own pre-processing handlers and either an identity, bridge, or rule
//!   based conversion between the two ports' element types.
//! - **WorkflowManager**: composes actors and connections, owning their
//!   combined start/pause/stop/dispose ordering.
//! - **SupervisorActor**: a dynamic `ActorId -> Actor` registry supporting
//!   hot-swap of a running actor for a structurally compatible
//!   replacement.
//!
//! # Module Organization
//!
//! ## Core Runtime
//! - [`message`] - `PortValue`, `Envelope`, `MessagePriority`
//! - [`port`] - `Port`, `PortConnection`, handlers, rules, adapters
//! - [`actor`] - `Actor`, `ActorState`, `ActorMetrics`
//!
//! ## Composition
//! - [`workflow`] - `WorkflowManager`, `ConnectionSpec`
//! - [`supervisor`] - `SupervisorActor`, dynamic registration and hot-swap
//!
//! ## Infrastructure
//! - [`config`] - `RuntimeConfig`, `PortConfig`
//! - [`snapshot`] - `ActorStateSnapshot`, persistable actor state
//! - [`script`] - `ScriptEngine`, an opaque pluggable scripting backend
//! - [`error`] - `RuntimeError`, the crate-wide error taxonomy
//! - [`util`] - id types and small serde helpers
//!
//! # Architecture Principles
//!
//! ## Type Erasure at the Edges Only
//! - An actor's port map stores `Arc<dyn ErasedPort>`; every operation
//!   that needs the concrete element type recovers it via one
//!   `Any::downcast_ref` at the boundary, then works with a concrete
//!   `Port<T>` from there on.
//! - A `WorkflowManager`'s connections are stored behind `ErasedConnection`
//!   for the same reason: connections of differing `IN`/`OUT` share one
//!   map.
//!
//! ## Explicit Lifecycle States
//! - `Actor`, `WorkflowManager`, and `SupervisorActor` each track their own
//!   state machine and reject operations that don't make sense in the
//!   current state, rather than silently no-op-ing.
//!
//! ## Standards Compliance
//! - **chrono `DateTime<Utc>`** for every timestamp (envelopes, metrics
//!   samples, snapshots).
//! - **3-layer import organization** (std -> third-party -> internal) in
//!   every module.
//! - **`mod.rs` files contain only declarations and re-exports.**

pub mod actor;
pub mod config;
pub mod error;
pub mod message;
pub mod port;
pub mod script;
pub mod snapshot;
pub mod supervisor;
pub mod util;
pub mod workflow;

pub mod prelude;

// Re-export commonly used types
pub use actor::{Actor, ActorMetrics, ActorState, MetricsSnapshot};
pub use config::{PortConfig, RuntimeConfig};
pub use error::{Result, RuntimeError, SendFailure};
pub use message::{Envelope, MessagePriority, PortValue};
pub use port::{DynValue, Port, PortConnection, PortKind};
pub use script::{CompiledScript, ScriptEngine};
pub use snapshot::ActorStateSnapshot;
pub use supervisor::{SupervisorActor, TypeDescriptor};
pub use util::{ActorId, SupervisorId, WorkflowId};
pub use workflow::{ConnectionSpec, WorkflowManager, WorkflowState};
