//! Process-wide handle owning one engine behind its lock.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use logging::{trace_engine, trace_stats};

use crate::algorithm::{Algorithm, BLOCK_SIZE};
use crate::backend::{BlockEngine, check_run};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::lock::EngineLock;

/// Counters describing the work a [`SharedEngine`] has done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Completed runs.
    pub runs: u64,
    /// Blocks absorbed by completed runs.
    pub blocks: u64,
    /// Runs that ended in an engine fault.
    pub faults: u64,
}

/// One block engine shared by many sessions.
///
/// Every run goes through [`process_blocks`](Self::process_blocks), which
/// holds the engine lock for exactly one seed, absorb and flush cycle.
pub struct SharedEngine {
    lock: EngineLock<Box<dyn BlockEngine>>,
    config: EngineConfig,
    supported: Vec<Algorithm>,
    runs: AtomicU64,
    blocks: AtomicU64,
    faults: AtomicU64,
}

impl SharedEngine {
    /// Brings up `backend` and wraps it for sharing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ResourceUnavailable`] when bring-up fails.
    pub fn new<E>(mut backend: E, config: EngineConfig) -> EngineResult<Arc<Self>>
    where
        E: BlockEngine + 'static,
    {
        backend.bring_up().map_err(|err| match err {
            EngineError::ResourceUnavailable { reason } => {
                EngineError::ResourceUnavailable { reason }
            }
            other => EngineError::ResourceUnavailable {
                reason: other.to_string(),
            },
        })?;
        let supported: Vec<Algorithm> = Algorithm::ALL
            .into_iter()
            .filter(|algorithm| backend.supports(*algorithm))
            .collect();
        trace_engine!(
            "engine ready for {:?}, lock timeout {:?}",
            supported,
            config.lock_timeout()
        );

        Ok(Arc::new(Self {
            lock: EngineLock::new(Box::new(backend)),
            config,
            supported,
            runs: AtomicU64::new(0),
            blocks: AtomicU64::new(0),
            faults: AtomicU64::new(0),
        }))
    }

    /// Configuration the engine was created with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns `true` when the backend can run `algorithm`.
    #[must_use]
    pub fn supports(&self, algorithm: Algorithm) -> bool {
        self.supported.contains(&algorithm)
    }

    /// Advances `state` by every block in `blocks` under the engine lock.
    ///
    /// `state` is left untouched when the run fails.
    ///
    /// # Errors
    ///
    /// Shape errors are reported before the lock is taken. Lock errors
    /// ([`EngineError::LockTimeout`], [`EngineError::ReentrantLock`]) leave
    /// the engine untouched. Backend faults are passed through.
    pub fn process_blocks(
        &self,
        algorithm: Algorithm,
        state: &mut [u32],
        blocks: &[u8],
    ) -> EngineResult<()> {
        check_run(algorithm, state, blocks)?;

        let mut engine = self.lock.acquire_with(self.config.lock_timeout())?;
        let count = blocks.len() / BLOCK_SIZE;
        match engine.process_blocks(algorithm, state, blocks) {
            Ok(()) => {
                drop(engine);
                self.runs.fetch_add(1, Ordering::Relaxed);
                self.blocks.fetch_add(count as u64, Ordering::Relaxed);
                trace_engine!("{} run of {} blocks", algorithm, count);
                Ok(())
            }
            Err(err) => {
                drop(engine);
                if !err.is_pre_engine() {
                    self.faults.fetch_add(1, Ordering::Relaxed);
                }
                trace_engine!("{} run of {} blocks failed: {}", algorithm, count, err);
                Err(err)
            }
        }
    }

    /// Snapshot of the work counters.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            runs: self.runs.load(Ordering::Relaxed),
            blocks: self.blocks.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
        }
    }

    /// Logs the work counters under the stats target.
    pub fn log_stats(&self) {
        let stats = self.stats();
        trace_stats!(
            "{} runs, {} blocks, {} faults",
            stats.runs,
            stats.blocks,
            stats.faults
        );
    }

    /// Returns `true` while a run is in progress.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.lock.is_locked()
    }

    /// Returns the engine lock.
    ///
    /// Holding a guard from this lock while calling
    /// [`process_blocks`](Self::process_blocks) on the same thread reports
    /// [`EngineError::ReentrantLock`].
    #[must_use]
    pub const fn lock(&self) -> &EngineLock<Box<dyn BlockEngine>> {
        &self.lock
    }
}

impl fmt::Debug for SharedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEngine")
            .field("config", &self.config)
            .field("supported", &self.supported)
            .field("stats", &self.stats())
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}
