//! Engine wrapper that records every run.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Instant;

use crate::algorithm::{Algorithm, BLOCK_SIZE};
use crate::error::{EngineError, EngineResult, FaultReason};

use super::BlockEngine;

/// One recorded engine run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Algorithm of the run.
    pub algorithm: Algorithm,
    /// Number of whole blocks the run absorbed.
    pub blocks: usize,
    /// When the run was seeded.
    pub entered: Instant,
    /// When the run finished, successfully or not.
    pub exited: Instant,
    /// Thread that drove the run.
    pub thread: ThreadId,
}

impl Invocation {
    /// Returns `true` when the two runs were in progress at the same time.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.entered < other.exited && other.entered < self.exited
    }
}

/// Shared, cloneable log of [`Invocation`]s.
#[derive(Clone, Debug, Default)]
pub struct InvocationLog {
    entries: Arc<Mutex<Vec<Invocation>>>,
}

impl InvocationLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out every recorded run in completion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Invocation> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total blocks absorbed across all recorded runs.
    #[must_use]
    pub fn total_blocks(&self) -> usize {
        self.snapshot().iter().map(|run| run.blocks).sum()
    }

    /// Returns the first pair of runs that overlapped in time, if any.
    #[must_use]
    pub fn find_overlap(&self) -> Option<(Invocation, Invocation)> {
        let mut runs = self.snapshot();
        runs.sort_by_key(|run| run.entered);
        runs.windows(2)
            .find(|pair| pair[0].overlaps(&pair[1]))
            .map(|pair| (pair[0].clone(), pair[1].clone()))
    }

    fn push(&self, invocation: Invocation) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation);
    }
}

#[derive(Debug)]
struct Current {
    algorithm: Algorithm,
    blocks: usize,
    entered: Instant,
}

/// [`BlockEngine`] wrapper that logs each run and can inject a fault.
#[derive(Debug)]
pub struct RecordingEngine<E> {
    inner: E,
    log: InvocationLog,
    current: Option<Current>,
    runs: u64,
    fail_on_run: Option<u64>,
}

impl<E: BlockEngine> RecordingEngine<E> {
    /// Wraps `inner`, recording into `log`.
    #[must_use]
    pub const fn new(inner: E, log: InvocationLog) -> Self {
        Self {
            inner,
            log,
            current: None,
            runs: 0,
            fail_on_run: None,
        }
    }

    /// Makes the zero-based `run`-th run fail with an injected fault after
    /// it has been seeded.
    #[must_use]
    pub const fn fail_on_run(mut self, run: u64) -> Self {
        self.fail_on_run = Some(run);
        self
    }

    /// Returns the log this engine records into.
    #[must_use]
    pub const fn log(&self) -> &InvocationLog {
        &self.log
    }

    fn finish(&mut self) {
        if let Some(current) = self.current.take() {
            self.log.push(Invocation {
                algorithm: current.algorithm,
                blocks: current.blocks,
                entered: current.entered,
                exited: Instant::now(),
                thread: thread::current().id(),
            });
        }
    }
}

impl<E: BlockEngine> BlockEngine for RecordingEngine<E> {
    fn bring_up(&mut self) -> EngineResult<()> {
        self.inner.bring_up()
    }

    fn supports(&self, algorithm: Algorithm) -> bool {
        self.inner.supports(algorithm)
    }

    fn seed(&mut self, algorithm: Algorithm, state: &[u32]) -> EngineResult<()> {
        self.current = Some(Current {
            algorithm,
            blocks: 0,
            entered: Instant::now(),
        });
        let run = self.runs;
        self.runs += 1;
        if self.fail_on_run == Some(run) {
            self.finish();
            return Err(EngineError::fault(algorithm, FaultReason::Injected { run }));
        }
        let result = self.inner.seed(algorithm, state);
        if result.is_err() {
            self.finish();
        }
        result
    }

    fn absorb(&mut self, blocks: &[u8]) -> EngineResult<()> {
        if let Some(current) = self.current.as_mut() {
            current.blocks += blocks.len() / BLOCK_SIZE;
        }
        let result = self.inner.absorb(blocks);
        if result.is_err() {
            self.finish();
        }
        result
    }

    fn flush(&mut self, state: &mut [u32]) -> EngineResult<()> {
        let result = self.inner.flush(state);
        self.finish();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SoftwareEngine;
    use std::time::Duration;

    #[test]
    fn records_each_run() {
        let log = InvocationLog::new();
        let mut engine = RecordingEngine::new(SoftwareEngine::new(), log.clone());
        let mut state = Algorithm::Sha1.initial_state().to_vec();

        engine
            .process_blocks(Algorithm::Sha1, &mut state, &[0u8; 128])
            .unwrap();
        engine
            .process_blocks(Algorithm::Sha1, &mut state, &[])
            .unwrap();

        let runs = log.snapshot();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].blocks, 2);
        assert_eq!(runs[1].blocks, 0);
        assert!(runs[0].entered <= runs[0].exited);
        assert_eq!(log.total_blocks(), 2);
        assert!(log.find_overlap().is_none());
    }

    #[test]
    fn injected_fault_hits_requested_run() {
        let log = InvocationLog::new();
        let mut engine = RecordingEngine::new(SoftwareEngine::new(), log.clone()).fail_on_run(1);
        let mut state = Algorithm::Md5.initial_state().to_vec();

        engine
            .process_blocks(Algorithm::Md5, &mut state, &[0u8; 64])
            .unwrap();
        let before = state.clone();
        let err = engine
            .process_blocks(Algorithm::Md5, &mut state, &[0u8; 64])
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::fault(Algorithm::Md5, FaultReason::Injected { run: 1 })
        );
        assert_eq!(state, before);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn overlap_detection() {
        let base = Instant::now();
        let run = |start: u64, end: u64| Invocation {
            algorithm: Algorithm::Md5,
            blocks: 1,
            entered: base + Duration::from_millis(start),
            exited: base + Duration::from_millis(end),
            thread: thread::current().id(),
        };
        assert!(run(0, 10).overlaps(&run(5, 15)));
        assert!(!run(0, 10).overlaps(&run(10, 20)));
    }
}
