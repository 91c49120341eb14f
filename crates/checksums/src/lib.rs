#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `checksums` turns arbitrarily chunked byte streams into MD5, SHA-1,
//! SHA-224 and SHA-256 digests computed on a shared fixed-block engine from
//! the `engine` crate.
//!
//! # Design
//!
//! A [`Session`] owns a [`StreamAccumulator`] holding the running state, the
//! total length and a partial block. Whole blocks go to the
//! [`SharedEngine`](engine::SharedEngine) one run at a time; the engine lock
//! is never held between calls, so any number of sessions can interleave on
//! one engine. [`Session::finalize`] pads the tail and serialises the
//! [`Digest`].
//!
//! After `finalize` a session only reports its digest. An engine error part
//! way through an update poisons the session until [`Session::reset`].
//!
//! The [`strong`] module wraps sessions in typed hashers that return
//! fixed-size arrays, and the `parallel` feature adds rayon-driven batch
//! hashing.
//!
//! # Examples
//!
//! ```
//! use checksums::Session;
//! use engine::{Algorithm, EngineConfig, SharedEngine, SoftwareEngine};
//!
//! let engine = SharedEngine::new(SoftwareEngine::new(), EngineConfig::default()).unwrap();
//! let mut session = Session::init(engine, Algorithm::Sha256).unwrap();
//! session.update(b"ab").unwrap();
//! session.update(b"c").unwrap();
//! assert_eq!(
//!     session.finalize().unwrap().to_hex(),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
//! );
//! ```

mod accumulator;
mod digest;
mod error;
mod finalize;
mod session;
pub mod strong;

#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub mod parallel;

pub use accumulator::{MAX_MESSAGE_LEN, StreamAccumulator};
pub use digest::Digest;
pub use error::{ReadError, SessionError, SessionResult, UsageError};
pub use finalize::{PaddedTail, finish};
pub use session::{Session, digest_file, digest_once, digest_reader};
