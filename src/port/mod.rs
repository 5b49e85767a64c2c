//! Ports and connections: the runtime's message-passing primitives.
//!
//! # Module Organization
//!
//! This `mod.rs` contains only module declarations and re-exports.
//!
//! - `core.rs` — [`ErasedPort`] and [`PortKind`], the type-erased face
//!   stored in an actor's heterogeneous port map.
//! - `typed.rs` — [`Port`], the generic handle actors and connections use.
//! - `any.rs` — [`DynValue`], the payload for a port with no static
//!   element type.
//! - `handler.rs` — [`MessageHandler`], the send-pipeline transformation.
//! - `rule.rs` — [`ConversionRule`], a candidate `IN -> OUT` conversion.
//! - `adapter.rs` — [`ProtocolAdapter`] (a port's own encode/decode step)
//!   and [`ProtocolBridge`] (a connection's cross-type bridge).
//! - `connection.rs` — [`PortConnection`], the routing task between two
//!   ports.
//! - `gate.rs` — [`gate::ActorGate`], the owning actor's control handles
//!   attached to a port so its send pipeline honors that actor's lifecycle.

pub mod adapter;
pub mod any;
pub mod connection;
pub mod core;
pub(crate) mod gate;
pub mod handler;
pub mod rule;
pub mod typed;

pub use adapter::{ProtocolAdapter, ProtocolBridge};
pub use any::DynValue;
pub use connection::PortConnection;
pub use core::{ErasedPort, PortKind};
pub use handler::{handler_fn, MessageHandler};
pub use rule::{rule_fn, ConversionRule};
pub use typed::Port;
