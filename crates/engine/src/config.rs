//! Configuration for a [`SharedEngine`](crate::SharedEngine).
//!
//! ```rust
//! use std::time::Duration;
//! use engine::EngineConfig;
//!
//! let config = EngineConfig::builder()
//!     .lock_timeout(Some(Duration::from_millis(250)))
//!     .busy_poll_limit(Some(10_000))
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.lock_timeout(), Some(Duration::from_millis(250)));
//! ```

use std::time::Duration;

/// Errors that can occur when building an [`EngineConfig`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// An option value is out of range.
    #[error("value out of range for {option}: expected {range}")]
    ValueOutOfRange {
        /// Name of the option with invalid value.
        option: &'static str,
        /// Description of the valid range.
        range: &'static str,
    },
}

/// Tunables shared by every session that uses one engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    lock_timeout: Option<Duration>,
    busy_poll_limit: Option<u64>,
}

impl EngineConfig {
    /// Starts a builder with default values.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// How long a run waits for the engine lock. `None` waits forever.
    #[must_use]
    pub const fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout
    }

    /// How many times a register backend polls the busy flag before reporting
    /// a fault. `None` polls forever.
    #[must_use]
    pub const fn busy_poll_limit(&self) -> Option<u64> {
        self.busy_poll_limit
    }
}

/// Fluent builder for [`EngineConfig`].
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    lock_timeout: Option<Duration>,
    busy_poll_limit: Option<u64>,
}

impl EngineConfigBuilder {
    /// Sets the lock timeout.
    #[must_use]
    pub const fn lock_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Sets the busy poll limit.
    #[must_use]
    pub const fn busy_poll_limit(mut self, limit: Option<u64>) -> Self {
        self.busy_poll_limit = limit;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValueOutOfRange`] for a zero poll limit.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        if self.busy_poll_limit == Some(0) {
            return Err(ConfigError::ValueOutOfRange {
                option: "busy_poll_limit",
                range: "at least 1",
            });
        }
        Ok(EngineConfig {
            lock_timeout: self.lock_timeout,
            busy_poll_limit: self.busy_poll_limit,
        })
    }
}
