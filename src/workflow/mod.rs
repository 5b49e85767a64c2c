//! Composing actors into a dataflow graph.
//!
//! # Module Organization
//!
//! This `mod.rs` contains only module declarations and re-exports.
//!
//! - `spec.rs` — [`ConnectionSpec`], the durable description of a wire.
//! - `erased.rs` — [`ErasedConnection`], the type-erased face of a live
//!   `PortConnection` stored in the manager's connection map.
//! - `state.rs` — [`WorkflowState`], the workflow-level lifecycle machine.
//! - `manager.rs` — [`WorkflowManager`] itself.

pub mod erased;
pub mod manager;
pub mod spec;
pub mod state;

pub use erased::ErasedConnection;
pub use manager::WorkflowManager;
pub use spec::ConnectionSpec;
pub use state::WorkflowState;
