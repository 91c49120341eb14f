//! Error types for hash sessions.

use std::io;

use engine::EngineError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Misuse of a session. Never changes session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// `update` or `finalize` called after `finalize` succeeded.
    #[error("session already finalized")]
    Finalized,

    /// An earlier engine error left the session state unusable.
    #[error("session poisoned by an earlier engine error; reset it before reuse")]
    Poisoned,

    /// The message would exceed the longest length the padding can encode.
    #[error("message length would exceed {max} bytes")]
    LengthOverflow {
        /// Longest accepted message, in bytes.
        max: u64,
    },
}

/// Errors returned by [`Session`](crate::Session) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The caller used the session incorrectly.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// The shared engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl SessionError {
    /// Returns `true` for [`SessionError::Usage`].
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Returns the usage error, if any.
    #[must_use]
    pub const fn usage(&self) -> Option<UsageError> {
        match self {
            Self::Usage(usage) => Some(*usage),
            Self::Engine(_) => None,
        }
    }
}

/// Errors from hashing a byte stream read through [`io::Read`].
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// Opening or reading the input failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The session rejected the bytes.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<EngineError> for ReadError {
    fn from(err: EngineError) -> Self {
        Self::Session(err.into())
    }
}
