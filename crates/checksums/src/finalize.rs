//! Merkle-Damgard padding and the final engine run.

use engine::{Algorithm, BLOCK_SIZE, MAX_STATE_WORDS, SharedEngine};
use logging::trace_final;

use crate::accumulator::StreamAccumulator;
use crate::digest::Digest;
use crate::error::SessionResult;

/// Offset of the 64-bit length trailer within the last block.
const LENGTH_OFFSET: usize = BLOCK_SIZE - 8;

/// The padded trailing partial block: one or two whole blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaddedTail {
    bytes: [u8; 2 * BLOCK_SIZE],
    len: usize,
}

impl PaddedTail {
    /// Pads `tail` (fewer than 64 bytes) for a message of `total_len` bytes.
    ///
    /// Appends `0x80`, zero-fills to 56 mod 64 and writes the bit length in
    /// the algorithm's byte order.
    #[must_use]
    pub fn new(algorithm: Algorithm, tail: &[u8], total_len: u64) -> Self {
        debug_assert!(tail.len() < BLOCK_SIZE);
        let mut bytes = [0u8; 2 * BLOCK_SIZE];
        bytes[..tail.len()].copy_from_slice(tail);
        bytes[tail.len()] = 0x80;

        let len = if tail.len() < LENGTH_OFFSET {
            BLOCK_SIZE
        } else {
            2 * BLOCK_SIZE
        };
        let bits = total_len.wrapping_mul(8);
        bytes[len - 8..len].copy_from_slice(&algorithm.word_order().length_bytes(bits));
        Self { bytes, len }
    }

    /// The padded blocks.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Number of blocks (1 or 2).
    #[must_use]
    pub const fn blocks(&self) -> usize {
        self.len / BLOCK_SIZE
    }
}

/// Pads the accumulator's tail, runs the final blocks and serialises the
/// digest. The accumulator itself is not modified.
///
/// # Errors
///
/// Engine errors from the final run.
pub fn finish(accumulator: &StreamAccumulator, engine: &SharedEngine) -> SessionResult<Digest> {
    let algorithm = accumulator.algorithm();
    let tail = PaddedTail::new(algorithm, accumulator.pending(), accumulator.total_len());
    trace_final!(
        "{}: padding {} buffered bytes of {} into {} blocks",
        algorithm,
        accumulator.buffered(),
        accumulator.total_len(),
        tail.blocks()
    );

    let width = algorithm.state_words();
    let mut state = [0u32; MAX_STATE_WORDS];
    state[..width].copy_from_slice(accumulator.state());
    engine.process_blocks(algorithm, &mut state[..width], tail.as_bytes())?;

    Ok(Digest::from_state(algorithm, &state[..width]))
}
