//! Per-session buffering between byte streams and whole-block engine runs.
//!
//! [`StreamAccumulator::update`] turns arbitrarily chunked input into engine
//! runs of whole 64-byte blocks. When the buffer is empty and at least one
//! block arrives, the block-aligned prefix goes straight to the engine;
//! otherwise bytes are copied into the buffer, which is handed to the engine
//! as soon as it fills. Both paths produce the same state.

use engine::{Algorithm, BLOCK_SIZE, MAX_STATE_WORDS, SharedEngine};
use logging::trace_stream;

use crate::error::{SessionResult, UsageError};

/// Longest message whose bit length still fits the 64-bit length trailer.
pub const MAX_MESSAGE_LEN: u64 = u64::MAX / 8;

/// Running state of one hash computation.
///
/// Between calls `buffered() < 64`, `total_len()` counts every byte ever
/// accepted, and `state()` reflects every complete block seen so far.
#[derive(Clone, Debug)]
pub struct StreamAccumulator {
    algorithm: Algorithm,
    state: [u32; MAX_STATE_WORDS],
    total_len: u64,
    buffer: [u8; BLOCK_SIZE],
    buffered: usize,
}

impl StreamAccumulator {
    /// Creates an accumulator holding the algorithm's initial state.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        let mut state = [0u32; MAX_STATE_WORDS];
        let initial = algorithm.initial_state();
        state[..initial.len()].copy_from_slice(initial);
        Self {
            algorithm,
            state,
            total_len: 0,
            buffer: [0; BLOCK_SIZE],
            buffered: 0,
        }
    }

    /// Selected algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Running state words.
    #[must_use]
    pub fn state(&self) -> &[u32] {
        &self.state[..self.algorithm.state_words()]
    }

    /// Bytes accepted so far.
    #[must_use]
    pub const fn total_len(&self) -> u64 {
        self.total_len
    }

    /// Bytes waiting in the partial-block buffer.
    #[must_use]
    pub const fn buffered(&self) -> usize {
        self.buffered
    }

    /// The buffered partial block.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buffer[..self.buffered]
    }

    /// Feeds `data` through the engine, buffering any partial block.
    ///
    /// Counters only advance past bytes whose engine run succeeded, so after
    /// an error the accumulator describes the last consistent point.
    ///
    /// # Errors
    ///
    /// [`UsageError::LengthOverflow`] before anything changes when the total
    /// would pass [`MAX_MESSAGE_LEN`]; engine errors from the runs.
    pub fn update(&mut self, engine: &SharedEngine, data: &[u8]) -> SessionResult<()> {
        if data.is_empty() {
            return Ok(());
        }
        let added = u64::try_from(data.len()).unwrap_or(u64::MAX);
        if self
            .total_len
            .checked_add(added)
            .is_none_or(|total| total > MAX_MESSAGE_LEN)
        {
            return Err(UsageError::LengthOverflow {
                max: MAX_MESSAGE_LEN,
            }
            .into());
        }

        let width = self.algorithm.state_words();
        let mut rest = data;
        while !rest.is_empty() {
            if self.buffered == 0 && rest.len() >= BLOCK_SIZE {
                let n = rest.len() - rest.len() % BLOCK_SIZE;
                trace_stream!("forwarding {} bytes directly", n);
                engine.process_blocks(self.algorithm, &mut self.state[..width], &rest[..n])?;
                self.total_len += n as u64;
                rest = &rest[n..];
            } else {
                let take = rest.len().min(BLOCK_SIZE - self.buffered);
                let end = self.buffered + take;
                self.buffer[self.buffered..end].copy_from_slice(&rest[..take]);
                if end == BLOCK_SIZE {
                    trace_stream!("buffer full, flushing one block");
                    engine.process_blocks(self.algorithm, &mut self.state[..width], &self.buffer)?;
                    self.buffered = 0;
                } else {
                    trace_stream!("buffering {} bytes ({} pending)", take, end);
                    self.buffered = end;
                }
                self.total_len += take as u64;
                rest = &rest[take..];
            }
        }
        Ok(())
    }
}
