//! Parallel hashing of many inputs on one shared engine.
//!
//! Every input gets its own [`Session`](crate::Session); rayon spreads the
//! sessions across its pool while the engine lock serialises the block runs.
//! Results come back in input order.

use std::path::Path;
use std::sync::Arc;

use engine::{Algorithm, SharedEngine};
use rayon::prelude::*;

use crate::digest::Digest;
use crate::error::{ReadError, SessionResult};
use crate::session::{digest_file, digest_once};

/// Hashes each input in its own session.
///
/// # Examples
///
/// ```
/// use checksums::parallel::digest_batch;
/// use engine::{Algorithm, EngineConfig, SharedEngine, SoftwareEngine};
///
/// let engine = SharedEngine::new(SoftwareEngine::new(), EngineConfig::default()).unwrap();
/// let inputs: [&[u8]; 2] = [b"", b"abc"];
/// let digests = digest_batch(&engine, Algorithm::Md5, &inputs);
/// assert_eq!(digests[1].as_ref().unwrap().to_hex(), "900150983cd24fb0d6963f7d28e17f72");
/// ```
pub fn digest_batch<T>(
    engine: &Arc<SharedEngine>,
    algorithm: Algorithm,
    inputs: &[T],
) -> Vec<SessionResult<Digest>>
where
    T: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|input| digest_once(engine, algorithm, input.as_ref()))
        .collect()
}

/// Reads and hashes each file in its own session.
pub fn digest_files<P>(
    engine: &Arc<SharedEngine>,
    algorithm: Algorithm,
    paths: &[P],
) -> Vec<Result<Digest, ReadError>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| digest_file(engine, algorithm, path.as_ref()))
        .collect()
}
