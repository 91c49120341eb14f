//! Finished digest value.

use std::fmt;

use engine::{Algorithm, MAX_DIGEST_LEN};

/// A finished digest of up to [`MAX_DIGEST_LEN`] bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: Algorithm,
    bytes: [u8; MAX_DIGEST_LEN],
    len: usize,
}

impl Digest {
    /// Serialises the leading words of `state` in the algorithm's byte order
    /// and truncates to the digest length.
    #[must_use]
    pub fn from_state(algorithm: Algorithm, state: &[u32]) -> Self {
        let order = algorithm.word_order();
        let mut bytes = [0u8; MAX_DIGEST_LEN];
        for (out, word) in bytes.chunks_exact_mut(4).zip(state) {
            out.copy_from_slice(&order.word_bytes(*word));
        }
        Self {
            algorithm,
            bytes,
            len: algorithm.digest_len(),
        }
    }

    /// Algorithm that produced the digest.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Digest length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; every supported algorithm has a non-empty digest.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lower-case hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_bytes()
            .iter()
            .try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}:{self})", self.algorithm.name())
    }
}
