//! Type-erased face of a live `PortConnection`, so a `WorkflowManager` can
//! hold connections of differing `IN`/`OUT` types in one map.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::error::Result;
use crate::message::PortValue;
use crate::port::PortConnection;

/// Object-safe face of a `PortConnection<IN, OUT>`.
#[async_trait]
pub trait ErasedConnection: Send + Sync {
    /// See [`PortConnection::validate`].
    fn validate(&self) -> Result<()>;

    /// See [`PortConnection::start`].
    fn start(&self) -> Result<()>;

    /// See [`PortConnection::stop_and_join`].
    async fn stop_and_join(&self) -> Result<()>;

    /// See [`PortConnection::is_running`].
    fn is_running(&self) -> bool;
}

#[async_trait]
impl<IN: PortValue, OUT: PortValue> ErasedConnection for PortConnection<IN, OUT> {
    fn validate(&self) -> Result<()> {
        PortConnection::validate(self)
    }

    fn start(&self) -> Result<()> {
        PortConnection::start(self)
    }

    async fn stop_and_join(&self) -> Result<()> {
        PortConnection::stop_and_join(self).await
    }

    fn is_running(&self) -> bool {
        PortConnection::is_running(self)
    }
}
