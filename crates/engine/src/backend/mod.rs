//! Block engine backends.
//!
//! A [`BlockEngine`] performs the per-block compression for one run at a
//! time. Runs always follow the same three steps: [`seed`](BlockEngine::seed)
//! loads the carried-over state into both state banks,
//! [`absorb`](BlockEngine::absorb) streams whole blocks through the engine,
//! and [`flush`](BlockEngine::flush) completes the pending block and reads
//! the live bank back. The engine keeps no session identity between runs.
//!
//! Implementations are not reentrant and must only be driven while the
//! [`EngineLock`](crate::EngineLock) is held; [`SharedEngine`](crate::SharedEngine)
//! is the public path that guarantees this.

mod peripheral;
mod recording;
mod simulated;
mod software;

pub use peripheral::{HashPeripheral, PeripheralEngine};
pub use recording::{Invocation, InvocationLog, RecordingEngine};
pub use simulated::{PeripheralFault, SimulatedPeripheral};
pub use software::SoftwareEngine;

use crate::algorithm::{Algorithm, BLOCK_SIZE};
use crate::error::{EngineError, EngineResult};

/// One fixed-block hash processing resource.
pub trait BlockEngine: Send {
    /// Prepares the resource for use. Called once when the shared engine is
    /// created.
    ///
    /// # Errors
    ///
    /// Any error is reported to the caller as
    /// [`EngineError::ResourceUnavailable`].
    fn bring_up(&mut self) -> EngineResult<()> {
        Ok(())
    }

    /// Returns `true` when the engine can run `algorithm`.
    fn supports(&self, algorithm: Algorithm) -> bool {
        let _ = algorithm;
        true
    }

    /// Selects `algorithm` and loads `state` into the seed bank and the live
    /// bank.
    ///
    /// # Errors
    ///
    /// Backend faults.
    fn seed(&mut self, algorithm: Algorithm, state: &[u32]) -> EngineResult<()>;

    /// Streams whole blocks through the engine.
    ///
    /// # Errors
    ///
    /// Backend faults.
    fn absorb(&mut self, blocks: &[u8]) -> EngineResult<()>;

    /// Completes the pending block and copies the live bank into `state`.
    ///
    /// # Errors
    ///
    /// Backend faults.
    fn flush(&mut self, state: &mut [u32]) -> EngineResult<()>;

    /// Runs one complete seed, absorb and flush cycle.
    ///
    /// `state` is only written after the flush succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Misaligned`] or [`EngineError::StateWidth`]
    /// before touching the engine when the arguments are malformed, and
    /// [`EngineError::Unsupported`] when the engine cannot run `algorithm`.
    fn process_blocks(
        &mut self,
        algorithm: Algorithm,
        state: &mut [u32],
        blocks: &[u8],
    ) -> EngineResult<()> {
        check_run(algorithm, state, blocks)?;
        if !self.supports(algorithm) {
            return Err(EngineError::Unsupported { algorithm });
        }

        self.seed(algorithm, state)?;
        self.absorb(blocks)?;
        self.flush(state)
    }
}

impl<E: BlockEngine + ?Sized> BlockEngine for Box<E> {
    fn bring_up(&mut self) -> EngineResult<()> {
        (**self).bring_up()
    }

    fn supports(&self, algorithm: Algorithm) -> bool {
        (**self).supports(algorithm)
    }

    fn seed(&mut self, algorithm: Algorithm, state: &[u32]) -> EngineResult<()> {
        (**self).seed(algorithm, state)
    }

    fn absorb(&mut self, blocks: &[u8]) -> EngineResult<()> {
        (**self).absorb(blocks)
    }

    fn flush(&mut self, state: &mut [u32]) -> EngineResult<()> {
        (**self).flush(state)
    }

    fn process_blocks(
        &mut self,
        algorithm: Algorithm,
        state: &mut [u32],
        blocks: &[u8],
    ) -> EngineResult<()> {
        (**self).process_blocks(algorithm, state, blocks)
    }
}

/// Validates the shape of a run.
///
/// # Errors
///
/// [`EngineError::Misaligned`] or [`EngineError::StateWidth`].
pub fn check_run(algorithm: Algorithm, state: &[u32], blocks: &[u8]) -> EngineResult<()> {
    if blocks.len() % BLOCK_SIZE != 0 {
        return Err(EngineError::Misaligned {
            len: blocks.len(),
            block_size: BLOCK_SIZE,
        });
    }
    if state.len() != algorithm.state_words() {
        return Err(EngineError::StateWidth {
            expected: algorithm.state_words(),
            actual: state.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_run_accepts_zero_blocks() {
        let state = Algorithm::Md5.initial_state();
        assert!(check_run(Algorithm::Md5, state, &[]).is_ok());
        assert!(check_run(Algorithm::Md5, state, &[0u8; 128]).is_ok());
    }

    #[test]
    fn process_blocks_validates_before_seeding() {
        let mut engine = SoftwareEngine::new();
        let mut state = Algorithm::Sha1.initial_state().to_vec();
        let err = engine
            .process_blocks(Algorithm::Sha1, &mut state, &[0u8; 10])
            .unwrap_err();
        assert!(matches!(err, EngineError::Misaligned { len: 10, .. }));
        assert_eq!(state, Algorithm::Sha1.initial_state());
    }

    #[test]
    fn boxed_engine_dispatches() {
        let mut engine: Box<dyn BlockEngine> = Box::new(SoftwareEngine::new());
        let mut state = Algorithm::Md5.initial_state().to_vec();
        engine
            .process_blocks(Algorithm::Md5, &mut state, &[0u8; 64])
            .unwrap();
        assert_ne!(state, Algorithm::Md5.initial_state());
    }
}
