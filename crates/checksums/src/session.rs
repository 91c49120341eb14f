//! Session lifecycle: `init`, any number of `update` calls, `finalize`.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use engine::{Algorithm, EngineError, SharedEngine};
use logging::trace_session;

use crate::accumulator::StreamAccumulator;
use crate::digest::Digest;
use crate::error::{ReadError, SessionError, SessionResult, UsageError};
use crate::finalize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Active,
    Finalized(Digest),
    Poisoned,
}

/// One hash computation over a shared engine.
///
/// A session is single-owner; many sessions may share one
/// [`SharedEngine`], and the engine lock is only held for the duration of
/// each engine run, never across calls.
///
/// # Examples
///
/// ```
/// use checksums::Session;
/// use engine::{Algorithm, EngineConfig, SharedEngine, SoftwareEngine};
///
/// let engine = SharedEngine::new(SoftwareEngine::new(), EngineConfig::default()).unwrap();
/// let mut session = Session::init(engine, Algorithm::Md5).unwrap();
/// session.update(b"message ").unwrap();
/// session.update(b"digest").unwrap();
/// let digest = session.finalize().unwrap();
/// assert_eq!(digest.to_hex(), "f96b697d7cb7938d525a2f31aaf161d0");
/// ```
#[derive(Debug)]
pub struct Session {
    engine: Arc<SharedEngine>,
    accumulator: StreamAccumulator,
    phase: Phase,
}

impl Session {
    /// Starts a session for `algorithm` on `engine`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Unsupported`] when the engine cannot run `algorithm`.
    pub fn init(engine: Arc<SharedEngine>, algorithm: Algorithm) -> SessionResult<Self> {
        if !engine.supports(algorithm) {
            return Err(EngineError::Unsupported { algorithm }.into());
        }
        trace_session!("{} session started", algorithm);
        Ok(Self {
            engine,
            accumulator: StreamAccumulator::new(algorithm),
            phase: Phase::Active,
        })
    }

    /// Feeds more message bytes.
    ///
    /// # Errors
    ///
    /// [`UsageError::Finalized`] or [`UsageError::Poisoned`] without touching
    /// any state; [`UsageError::LengthOverflow`]; engine errors. Backend
    /// faults poison the session. Lock errors do not; the growth of
    /// [`total_len`](Self::total_len) tells how much of `data` was taken.
    pub fn update(&mut self, data: &[u8]) -> SessionResult<()> {
        self.check_active()?;
        let result = self.accumulator.update(&self.engine, data);
        if let Err(SessionError::Engine(err)) = &result {
            if !err.is_pre_engine() {
                self.poison(err);
            }
        }
        result
    }

    /// Pads the remaining input, runs the final blocks and returns the
    /// digest. The session is read-only afterwards.
    ///
    /// # Errors
    ///
    /// As for [`update`](Self::update).
    pub fn finalize(&mut self) -> SessionResult<Digest> {
        self.check_active()?;
        match finalize::finish(&self.accumulator, &self.engine) {
            Ok(digest) => {
                trace_session!(
                    "{} session finalized after {} bytes: {}",
                    self.algorithm(),
                    self.accumulator.total_len(),
                    digest
                );
                self.phase = Phase::Finalized(digest);
                Ok(digest)
            }
            Err(SessionError::Engine(err)) => {
                if !err.is_pre_engine() {
                    self.poison(&err);
                }
                Err(SessionError::Engine(err))
            }
            Err(usage) => Err(usage),
        }
    }

    /// Re-initialises a finalized or poisoned session for another message
    /// with the same algorithm.
    pub fn reset(&mut self) {
        self.accumulator = StreamAccumulator::new(self.algorithm());
        self.phase = Phase::Active;
        trace_session!("{} session reset", self.algorithm());
    }

    /// The digest produced by [`finalize`](Self::finalize), if it ran.
    #[must_use]
    pub const fn digest(&self) -> Option<Digest> {
        match self.phase {
            Phase::Finalized(digest) => Some(digest),
            Phase::Active | Phase::Poisoned => None,
        }
    }

    /// Returns `true` once [`finalize`](Self::finalize) has succeeded.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        matches!(self.phase, Phase::Finalized(_))
    }

    /// Returns `true` after an engine error until [`reset`](Self::reset).
    #[must_use]
    pub const fn is_poisoned(&self) -> bool {
        matches!(self.phase, Phase::Poisoned)
    }

    /// Selected algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.accumulator.algorithm()
    }

    /// Bytes accepted so far.
    #[must_use]
    pub const fn total_len(&self) -> u64 {
        self.accumulator.total_len()
    }

    /// Read-only view of the running state.
    #[must_use]
    pub const fn accumulator(&self) -> &StreamAccumulator {
        &self.accumulator
    }

    /// The engine this session runs on.
    #[must_use]
    pub const fn engine(&self) -> &Arc<SharedEngine> {
        &self.engine
    }

    const fn check_active(&self) -> Result<(), UsageError> {
        match self.phase {
            Phase::Active => Ok(()),
            Phase::Finalized(_) => Err(UsageError::Finalized),
            Phase::Poisoned => Err(UsageError::Poisoned),
        }
    }

    fn poison(&mut self, err: &EngineError) {
        tracing::warn!(target: "accel::session", "{} session poisoned: {}", self.algorithm(), err);
        self.phase = Phase::Poisoned;
    }
}

/// Bytes go through [`Session::update`]. A failure after part of `buf` was
/// taken reports the accepted count; the error surfaces on the next write.
impl io::Write for Session {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let before = self.total_len();
        match self.update(buf) {
            Ok(()) => Ok(buf.len()),
            Err(err) => {
                let consumed = usize::try_from(self.total_len() - before).unwrap_or(buf.len());
                if consumed > 0 {
                    trace_session!(
                        "{} write stopped after {} of {} bytes: {}",
                        self.algorithm(),
                        consumed,
                        buf.len(),
                        err
                    );
                    Ok(consumed)
                } else {
                    Err(io::Error::other(err))
                }
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hashes `data` in a fresh session on `engine`.
///
/// # Errors
///
/// As for [`Session::init`], [`Session::update`] and [`Session::finalize`].
pub fn digest_once(
    engine: &Arc<SharedEngine>,
    algorithm: Algorithm,
    data: &[u8],
) -> SessionResult<Digest> {
    let mut session = Session::init(Arc::clone(engine), algorithm)?;
    session.update(data)?;
    session.finalize()
}

/// Read buffer for [`digest_reader`]; a multiple of the block size so
/// whole reads go straight to the engine.
const READ_BUFFER_LEN: usize = 64 * 1024;

/// Hashes everything `reader` yields in a fresh session on `engine`.
///
/// # Errors
///
/// [`ReadError::Io`] when reading fails and [`ReadError::Session`] for
/// session errors.
pub fn digest_reader<R: Read>(
    engine: &Arc<SharedEngine>,
    algorithm: Algorithm,
    mut reader: R,
) -> Result<Digest, ReadError> {
    let mut session = Session::init(Arc::clone(engine), algorithm)?;
    let mut buffer = vec![0u8; READ_BUFFER_LEN];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        session.update(&buffer[..n])?;
    }
    Ok(session.finalize()?)
}

/// Hashes the file at `path`.
///
/// # Errors
///
/// [`ReadError::Io`] when the file cannot be opened or read, otherwise
/// session errors.
pub fn digest_file(
    engine: &Arc<SharedEngine>,
    algorithm: Algorithm,
    path: &Path,
) -> Result<Digest, ReadError> {
    let file = File::open(path)?;
    digest_reader(engine, algorithm, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{
        BlockEngine, EngineConfig, FaultReason, InvocationLog, RecordingEngine, SoftwareEngine,
    };
    use std::io::Write as _;
    use std::time::Duration;

    fn software() -> Arc<SharedEngine> {
        SharedEngine::new(SoftwareEngine::new(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn finalize_locks_the_session() {
        let mut session = Session::init(software(), Algorithm::Sha256).unwrap();
        session.update(b"abc").unwrap();
        let digest = session.finalize().unwrap();
        assert!(session.is_finalized());
        assert_eq!(session.digest(), Some(digest));

        assert_eq!(
            session.update(b"more").unwrap_err(),
            SessionError::Usage(UsageError::Finalized)
        );
        assert_eq!(
            session.finalize().unwrap_err(),
            SessionError::Usage(UsageError::Finalized)
        );
        assert_eq!(session.total_len(), 3);
        assert_eq!(session.digest(), Some(digest));
    }

    #[test]
    fn unsupported_algorithm_rejected_at_init() {
        let engine =
            SharedEngine::new(SoftwareEngine::with_algorithms(&[Algorithm::Md5]), EngineConfig::default())
                .unwrap();
        let err = Session::init(engine, Algorithm::Sha1).unwrap_err();
        assert_eq!(
            err,
            SessionError::Engine(EngineError::Unsupported {
                algorithm: Algorithm::Sha1
            })
        );
    }

    #[test]
    fn engine_fault_poisons_until_reset() {
        let backend = RecordingEngine::new(SoftwareEngine::new(), InvocationLog::new()).fail_on_run(0);
        let engine = SharedEngine::new(backend, EngineConfig::default()).unwrap();
        let mut session = Session::init(engine, Algorithm::Md5).unwrap();

        let err = session.update(&[0u8; 64]).unwrap_err();
        assert_eq!(
            err,
            SessionError::Engine(EngineError::fault(
                Algorithm::Md5,
                FaultReason::Injected { run: 0 }
            ))
        );
        assert!(session.is_poisoned());
        assert_eq!(
            session.update(b"x").unwrap_err(),
            SessionError::Usage(UsageError::Poisoned)
        );
        assert_eq!(
            session.finalize().unwrap_err(),
            SessionError::Usage(UsageError::Poisoned)
        );

        session.reset();
        session.update(b"abc").unwrap();
        assert_eq!(
            session.finalize().unwrap().to_hex(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn reentrant_lock_does_not_poison() {
        let engine = software();
        let mut session = Session::init(Arc::clone(&engine), Algorithm::Sha1).unwrap();
        {
            let _held = engine.lock().acquire().unwrap();
            assert_eq!(
                session.update(&[0u8; 64]).unwrap_err(),
                SessionError::Engine(EngineError::ReentrantLock)
            );
        }
        assert!(!session.is_poisoned());
        assert_eq!(session.total_len(), 0);

        session.update(b"abc").unwrap();
        assert_eq!(
            session.finalize().unwrap().to_hex(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn write_impl_streams_through_update() {
        let mut session = Session::init(software(), Algorithm::Sha224).unwrap();
        session.write_all(b"ab").unwrap();
        session.write_all(b"c").unwrap();
        session.flush().unwrap();
        assert_eq!(
            session.finalize().unwrap().to_hex(),
            "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
        );

        let err = session.write(b"late").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(err.to_string(), "session already finalized");
    }

    /// Software backend whose `nth` run reports a lock timeout.
    struct TimesOutOnRun {
        inner: SoftwareEngine,
        nth: u64,
        runs: u64,
    }

    impl TimesOutOnRun {
        fn engine(nth: u64) -> Arc<SharedEngine> {
            let backend = Self {
                inner: SoftwareEngine::new(),
                nth,
                runs: 0,
            };
            SharedEngine::new(backend, EngineConfig::default()).unwrap()
        }
    }

    impl BlockEngine for TimesOutOnRun {
        fn seed(&mut self, algorithm: Algorithm, state: &[u32]) -> engine::EngineResult<()> {
            self.inner.seed(algorithm, state)
        }

        fn absorb(&mut self, blocks: &[u8]) -> engine::EngineResult<()> {
            self.inner.absorb(blocks)
        }

        fn flush(&mut self, state: &mut [u32]) -> engine::EngineResult<()> {
            self.inner.flush(state)
        }

        fn process_blocks(
            &mut self,
            algorithm: Algorithm,
            state: &mut [u32],
            blocks: &[u8],
        ) -> engine::EngineResult<()> {
            let run = self.runs;
            self.runs += 1;
            if run == self.nth {
                return Err(EngineError::LockTimeout {
                    waited: Duration::from_millis(5),
                });
            }
            self.inner.process_blocks(algorithm, state, blocks)
        }
    }

    #[test]
    fn write_reports_partial_progress_instead_of_error() {
        let mut session = Session::init(TimesOutOnRun::engine(1), Algorithm::Sha256).unwrap();
        session.update(&[1u8; 10]).unwrap();

        // The buffered block completes on run 0; the aligned remainder times out.
        let written = session.write(&[2u8; 182]).unwrap();
        assert_eq!(written, 54);
        assert_eq!(session.total_len(), 64);
        assert!(!session.is_poisoned());

        session.write_all(&[2u8; 128]).unwrap();
        let mut expected = vec![1u8; 10];
        expected.extend_from_slice(&[2u8; 182]);
        assert_eq!(
            session.finalize().unwrap(),
            digest_once(&software(), Algorithm::Sha256, &expected).unwrap()
        );
    }

    #[test]
    fn write_error_means_nothing_was_taken() {
        let mut session = Session::init(TimesOutOnRun::engine(0), Algorithm::Md5).unwrap();
        let err = session.write(&[0u8; 64]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(session.total_len(), 0);
        assert_eq!(
            err.get_ref()
                .and_then(|inner| inner.downcast_ref::<SessionError>()),
            Some(&SessionError::Engine(EngineError::LockTimeout {
                waited: Duration::from_millis(5)
            }))
        );
    }

    #[test]
    fn fault_after_progress_surfaces_on_next_write() {
        let backend = RecordingEngine::new(SoftwareEngine::new(), InvocationLog::new()).fail_on_run(1);
        let engine = SharedEngine::new(backend, EngineConfig::default()).unwrap();
        let mut session = Session::init(engine, Algorithm::Sha1).unwrap();
        session.update(&[0u8; 10]).unwrap();

        assert_eq!(session.write(&[0u8; 182]).unwrap(), 54);
        assert!(session.is_poisoned());
        let err = session.write(&[0u8; 128]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "session poisoned by an earlier engine error; reset it before reuse"
        );
    }

    #[test]
    fn digest_once_matches_session() {
        let engine = software();
        let once = digest_once(&engine, Algorithm::Sha256, b"").unwrap();
        assert_eq!(
            once.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_reader_streams_large_input() {
        let engine = software();
        let data = vec![b'a'; 200_000];
        let from_reader = digest_reader(&engine, Algorithm::Md5, data.as_slice()).unwrap();
        assert_eq!(from_reader, digest_once(&engine, Algorithm::Md5, &data).unwrap());
    }

    #[test]
    fn digest_reader_reports_io_errors() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            }
        }
        let err = digest_reader(&software(), Algorithm::Sha1, Broken).unwrap_err();
        assert!(matches!(err, ReadError::Io(ref source) if source.kind() == io::ErrorKind::PermissionDenied));
    }
}
