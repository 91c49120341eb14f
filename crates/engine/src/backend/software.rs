//! Pure-software engine running the compression functions directly.

use crate::algorithm::{Algorithm, MAX_STATE_WORDS};
use crate::compress::compress_blocks;
use crate::error::{EngineError, EngineResult, FaultReason};

/// Engine that compresses blocks on the calling thread.
///
/// The seed bank and the live bank coincide here, so seeding writes a single
/// copy of the state.
#[derive(Clone, Debug)]
pub struct SoftwareEngine {
    supported: Vec<Algorithm>,
    selected: Option<Algorithm>,
    live: [u32; MAX_STATE_WORDS],
}

impl SoftwareEngine {
    /// Creates an engine supporting every algorithm.
    #[must_use]
    pub fn new() -> Self {
        Self::with_algorithms(&Algorithm::ALL)
    }

    /// Creates an engine limited to `algorithms`.
    #[must_use]
    pub fn with_algorithms(algorithms: &[Algorithm]) -> Self {
        Self {
            supported: algorithms.to_vec(),
            selected: None,
            live: [0; MAX_STATE_WORDS],
        }
    }
}

impl Default for SoftwareEngine {
    fn default() -> Self {
        Self::new()
    }
}

// No run is in progress, so there is no algorithm to attribute the fault to;
// MD5 stands in as the first selector.
fn not_seeded() -> EngineError {
    EngineError::fault(Algorithm::ALL[0], FaultReason::NotSeeded)
}

impl super::BlockEngine for SoftwareEngine {
    fn supports(&self, algorithm: Algorithm) -> bool {
        self.supported.contains(&algorithm)
    }

    fn seed(&mut self, algorithm: Algorithm, state: &[u32]) -> EngineResult<()> {
        let width = algorithm.state_words();
        if state.len() != width {
            return Err(EngineError::StateWidth {
                expected: width,
                actual: state.len(),
            });
        }
        self.live[..width].copy_from_slice(state);
        self.selected = Some(algorithm);
        Ok(())
    }

    fn absorb(&mut self, blocks: &[u8]) -> EngineResult<()> {
        let algorithm = self.selected.ok_or_else(not_seeded)?;
        compress_blocks(
            algorithm,
            &mut self.live[..algorithm.state_words()],
            blocks,
        )
    }

    fn flush(&mut self, state: &mut [u32]) -> EngineResult<()> {
        let algorithm = self.selected.take().ok_or_else(not_seeded)?;
        let width = algorithm.state_words();
        if state.len() != width {
            return Err(EngineError::StateWidth {
                expected: width,
                actual: state.len(),
            });
        }
        state.copy_from_slice(&self.live[..width]);
        Ok(())
    }
}
