//! Runtime-wide and per-port configuration, builder-pattern style with
//! validation deferred to `build()`.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::error::{Result, RuntimeError};
use crate::port::PortKind;
use crate::util::duration_serde;

/// Default bounded queue capacity for a port created without an explicit
/// capacity.
pub const DEFAULT_PORT_CAPACITY: usize = 256;

/// Default grace period `WorkflowManager::dispose` allows a routing task
/// to drain before it is considered stuck.
pub const DEFAULT_SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Runtime-wide defaults. Not required by any component — `Actor` and
/// `WorkflowManager` accept explicit capacities/timeouts everywhere — but
/// a `RuntimeConfig` gives callers one place to set house defaults and
/// load them from a config file via `serde_json`.
///
/// # Example
///
/// ```rust
/// use portflow::config::RuntimeConfig;
///
/// let config = RuntimeConfig::builder()
///     .default_port_capacity(64)
///     .build()
///     .unwrap();
/// assert_eq!(config.default_port_capacity, 64);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Capacity used by `create_port` calls that don't specify one.
    pub default_port_capacity: usize,
    /// How long `WorkflowManager::dispose` waits for a routing task to
    /// join before logging a warning and proceeding anyway.
    #[serde(with = "duration_serde")]
    pub shutdown_grace_period: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_port_capacity: DEFAULT_PORT_CAPACITY,
            shutdown_grace_period: DEFAULT_SHUTDOWN_GRACE_PERIOD,
        }
    }
}

impl RuntimeConfig {
    /// Start building a config from defaults.
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    /// Reject a config with a zero port capacity.
    pub fn validate(&self) -> Result<()> {
        if self.default_port_capacity == 0 {
            return Err(RuntimeError::Validation(
                "default_port_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`RuntimeConfig`].
#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    default_port_capacity: Option<usize>,
    shutdown_grace_period: Option<Duration>,
}

impl RuntimeConfigBuilder {
    /// Override the default port capacity.
    pub fn default_port_capacity(mut self, capacity: usize) -> Self {
        self.default_port_capacity = Some(capacity);
        self
    }

    /// Override the shutdown grace period.
    pub fn shutdown_grace_period(mut self, period: Duration) -> Self {
        self.shutdown_grace_period = Some(period);
        self
    }

    /// Validate and produce the config.
    pub fn build(self) -> Result<RuntimeConfig> {
        let config = RuntimeConfig {
            default_port_capacity: self
                .default_port_capacity
                .unwrap_or(DEFAULT_PORT_CAPACITY),
            shutdown_grace_period: self
                .shutdown_grace_period
                .unwrap_or(DEFAULT_SHUTDOWN_GRACE_PERIOD),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Convenience bundle of the arguments `Actor::create_port` needs,
/// useful when ports are described declaratively (e.g. loaded from a
/// workflow definition file) rather than created one call at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortConfig {
    /// The port's name, unique within its owning actor.
    pub name: String,
    /// Source or target.
    pub kind: PortKind,
    /// Bounded queue capacity.
    pub capacity: usize,
}

impl PortConfig {
    /// A port config using the crate-wide default capacity.
    pub fn new(name: impl Into<String>, kind: PortKind) -> Self {
        Self {
            name: name.into(),
            kind,
            capacity: DEFAULT_PORT_CAPACITY,
        }
    }

    /// Override the capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
