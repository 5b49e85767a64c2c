//! The bound satisfied by any type flowing through a `Port<T>`.

// Layer 1: Standard library imports
use std::any::Any;
use std::fmt::Debug;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
// (none)

/// Marker bound for port element types.
///
/// `Port<T>` requires `T: PortValue` so that the actor's heterogeneous port
/// map can store ports behind a type-erased handle and recover the
/// concrete `Port<T>` via `Any` downcasting.
///
/// Blanket-implemented for every eligible type; user code never implements
/// this directly.
pub trait PortValue: Any + Send + Debug + 'static {}

impl<T: Any + Send + Debug + 'static> PortValue for T {}
