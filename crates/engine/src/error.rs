//! Common error types for the engine crate.

use std::time::Duration;

use crate::Algorithm;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Abnormal conditions a backend can report for a run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FaultReason {
    /// The busy flag stayed set past the configured poll limit.
    #[error("busy flag still set after {polls} polls")]
    BusyTimeout {
        /// Number of polls performed before giving up.
        polls: u64,
    },

    /// A fault injected by a test backend.
    #[error("injected fault on run {run}")]
    Injected {
        /// Zero-based index of the failing run.
        run: u64,
    },

    /// A data or flush operation arrived before the engine was seeded.
    #[error("engine used before seeding")]
    NotSeeded,
}

/// Errors that can occur during engine operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Bring-up of the backend failed while creating the shared engine.
    #[error("hash engine unavailable: {reason}")]
    ResourceUnavailable {
        /// Backend-supplied description of the failure.
        reason: String,
    },

    /// The backend signalled an abnormal condition during a run.
    #[error("{algorithm} engine fault: {reason}")]
    Fault {
        /// Algorithm of the failing run.
        algorithm: Algorithm,
        /// What went wrong.
        #[source]
        reason: FaultReason,
    },

    /// The configured lock timeout expired before the engine became free.
    #[error("timed out after {waited:?} waiting for the hash engine")]
    LockTimeout {
        /// How long the caller waited.
        waited: Duration,
    },

    /// The thread already holding the engine lock tried to acquire it again.
    #[error("hash engine lock is already held by the current thread")]
    ReentrantLock,

    /// Block data whose length is not a whole number of blocks.
    #[error("{len} bytes is not a multiple of the {block_size}-byte block size")]
    Misaligned {
        /// Length supplied by the caller.
        len: usize,
        /// Required block size.
        block_size: usize,
    },

    /// State vector of the wrong width for the selected algorithm.
    #[error("state vector has {actual} words, algorithm needs {expected}")]
    StateWidth {
        /// Width required by the algorithm.
        expected: usize,
        /// Width supplied by the caller.
        actual: usize,
    },

    /// The backend cannot run the requested algorithm.
    #[error("{algorithm} is not supported by this hash engine")]
    Unsupported {
        /// The rejected algorithm.
        algorithm: Algorithm,
    },
}

impl EngineError {
    /// Creates a [`EngineError::Fault`] for `algorithm`.
    #[must_use]
    pub const fn fault(algorithm: Algorithm, reason: FaultReason) -> Self {
        Self::Fault { algorithm, reason }
    }

    /// Returns `true` when the error was raised before any engine state was
    /// touched, so the caller's running state is still valid.
    #[must_use]
    pub const fn is_pre_engine(&self) -> bool {
        matches!(
            self,
            Self::LockTimeout { .. }
                | Self::ReentrantLock
                | Self::Misaligned { .. }
                | Self::StateWidth { .. }
                | Self::Unsupported { .. }
        )
    }
}
