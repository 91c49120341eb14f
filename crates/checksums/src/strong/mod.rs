//! Typed hashers returning fixed-size digest arrays.
//!
//! Each hasher wraps a [`Session`](crate::Session) on a shared engine and pins the
//! algorithm at the type level, so callers that know the algorithm up front
//! get `[u8; N]` back instead of a [`Digest`](crate::Digest).
//!
//! ```
//! use checksums::strong::{Sha1, StrongDigest};
//! use engine::{EngineConfig, SharedEngine, SoftwareEngine};
//!
//! let engine = SharedEngine::new(SoftwareEngine::new(), EngineConfig::default()).unwrap();
//! let digest = Sha1::digest(&engine, b"abc").unwrap();
//! assert_eq!(digest[..4], [0xa9, 0x99, 0x3e, 0x36]);
//! ```

use std::sync::Arc;

use engine::{Algorithm, SharedEngine};

use crate::error::SessionResult;

/// A hash algorithm fixed at compile time.
pub trait StrongDigest: Sized {
    /// Fixed-size digest output.
    type Digest: AsRef<[u8]> + Copy + Eq + std::fmt::Debug;

    /// Algorithm run on the engine.
    const ALGORITHM: Algorithm;

    /// Digest length in bytes.
    const DIGEST_LEN: usize;

    /// Starts a hasher on `engine`.
    ///
    /// # Errors
    ///
    /// As for [`Session::init`](crate::Session::init).
    fn new(engine: Arc<SharedEngine>) -> SessionResult<Self>;

    /// Feeds more bytes.
    ///
    /// # Errors
    ///
    /// As for [`Session::update`](crate::Session::update).
    fn update(&mut self, data: &[u8]) -> SessionResult<()>;

    /// Consumes the hasher and returns the digest.
    ///
    /// # Errors
    ///
    /// As for [`Session::finalize`](crate::Session::finalize).
    fn finalize(self) -> SessionResult<Self::Digest>;

    /// One-shot digest of `data`.
    ///
    /// # Errors
    ///
    /// As for [`new`](Self::new), [`update`](Self::update) and
    /// [`finalize`](Self::finalize).
    fn digest(engine: &Arc<SharedEngine>, data: &[u8]) -> SessionResult<Self::Digest> {
        let mut hasher = Self::new(Arc::clone(engine))?;
        hasher.update(data)?;
        hasher.finalize()
    }
}

macro_rules! typed_hasher {
    ($(#[$meta:meta])* $name:ident, $algorithm:expr, $len:literal) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            session: $crate::session::Session,
        }

        impl $name {
            /// The session driving this hasher.
            #[must_use]
            pub const fn session(&self) -> &$crate::session::Session {
                &self.session
            }
        }

        impl $crate::strong::StrongDigest for $name {
            type Digest = [u8; $len];

            const ALGORITHM: ::engine::Algorithm = $algorithm;
            const DIGEST_LEN: usize = $len;

            fn new(
                engine: ::std::sync::Arc<::engine::SharedEngine>,
            ) -> $crate::error::SessionResult<Self> {
                Ok(Self {
                    session: $crate::session::Session::init(engine, Self::ALGORITHM)?,
                })
            }

            fn update(&mut self, data: &[u8]) -> $crate::error::SessionResult<()> {
                self.session.update(data)
            }

            fn finalize(mut self) -> $crate::error::SessionResult<[u8; $len]> {
                let digest = self.session.finalize()?;
                let mut out = [0u8; $len];
                out.copy_from_slice(digest.as_bytes());
                Ok(out)
            }
        }

        impl ::std::io::Write for $name {
            fn write(&mut self, buf: &[u8]) -> ::std::io::Result<usize> {
                ::std::io::Write::write(&mut self.session, buf)
            }

            fn flush(&mut self) -> ::std::io::Result<()> {
                Ok(())
            }
        }
    };
}

mod md5;
mod sha1;
mod sha2;

pub use md5::Md5;
pub use sha1::Sha1;
pub use sha2::{Sha224, Sha256};

#[cfg(test)]
mod tests {
    use super::*;
    use engine::EngineConfig;
    use engine::SoftwareEngine;

    #[test]
    fn constants_agree_with_algorithm() {
        fn check<H: StrongDigest>() {
            assert_eq!(H::DIGEST_LEN, H::ALGORITHM.digest_len());
        }
        check::<Md5>();
        check::<Sha1>();
        check::<Sha224>();
        check::<Sha256>();
    }

    #[test]
    fn unsupported_engine_rejects_typed_hasher() {
        let engine = SharedEngine::new(
            SoftwareEngine::with_algorithms(&[Algorithm::Sha256]),
            EngineConfig::default(),
        )
        .unwrap();
        assert!(Sha256::new(Arc::clone(&engine)).is_ok());
        assert!(Md5::new(engine).is_err());
    }
}
