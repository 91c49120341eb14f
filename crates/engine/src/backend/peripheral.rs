//! Register-level engine driving a word-at-a-time hash peripheral.

use std::hint;

use logging::trace_engine;

use crate::algorithm::{Algorithm, BLOCK_SIZE};
use crate::error::{EngineError, EngineResult, FaultReason};

use super::BlockEngine;

/// Register interface of a hash peripheral.
///
/// Indices address words of the seed bank and the live bank. Data words
/// carry four message bytes packed little-endian.
pub trait HashPeripheral: Send {
    /// Enables the peripheral clock.
    ///
    /// # Errors
    ///
    /// A description of why the peripheral cannot be used.
    fn power_up(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Returns `true` when the peripheral implements `algorithm`.
    fn supports(&self, algorithm: Algorithm) -> bool {
        let _ = algorithm;
        true
    }

    /// Selects `algorithm` and starts a new digest calculation.
    fn init(&mut self, algorithm: Algorithm);

    /// Writes one word of the seed bank.
    fn write_seed(&mut self, index: usize, word: u32);

    /// Writes one word of the live bank.
    fn write_live(&mut self, index: usize, word: u32);

    /// Pushes one data word.
    fn write_data(&mut self, word: u32);

    /// Reads the busy flag.
    fn busy(&mut self) -> bool;

    /// Reads one word of the live bank.
    fn read_live(&self, index: usize) -> u32;
}

/// [`BlockEngine`] that drives a [`HashPeripheral`] register by register.
///
/// Each block is pushed as sixteen data words. The peripheral compresses a
/// block when the first word of the next one arrives, so the engine waits
/// for the busy flag after every first word and finishes each run with a
/// zero flush word before reading the live bank.
#[derive(Debug)]
pub struct PeripheralEngine<P> {
    peripheral: P,
    busy_poll_limit: Option<u64>,
    selected: Option<Algorithm>,
}

impl<P: HashPeripheral> PeripheralEngine<P> {
    /// Wraps `peripheral`; busy polling is unbounded.
    #[must_use]
    pub const fn new(peripheral: P) -> Self {
        Self {
            peripheral,
            busy_poll_limit: None,
            selected: None,
        }
    }

    /// Bounds busy polling; exceeding the limit faults the run.
    #[must_use]
    pub const fn with_busy_poll_limit(mut self, limit: Option<u64>) -> Self {
        self.busy_poll_limit = limit;
        self
    }

    /// Returns the wrapped peripheral.
    #[must_use]
    pub const fn peripheral(&self) -> &P {
        &self.peripheral
    }

    /// Consumes the engine and returns the peripheral.
    #[must_use]
    pub fn into_inner(self) -> P {
        self.peripheral
    }

    fn wait_idle(&mut self, algorithm: Algorithm) -> EngineResult<()> {
        let mut polls = 0u64;
        while self.peripheral.busy() {
            polls += 1;
            if self.busy_poll_limit.is_some_and(|limit| polls >= limit) {
                self.selected = None;
                return Err(EngineError::fault(
                    algorithm,
                    FaultReason::BusyTimeout { polls },
                ));
            }
            hint::spin_loop();
        }
        Ok(())
    }

    fn selected(&self) -> EngineResult<Algorithm> {
        self.selected
            .ok_or(EngineError::fault(Algorithm::ALL[0], FaultReason::NotSeeded))
    }
}

impl<P: HashPeripheral> BlockEngine for PeripheralEngine<P> {
    fn bring_up(&mut self) -> EngineResult<()> {
        self.peripheral
            .power_up()
            .map_err(|reason| EngineError::ResourceUnavailable { reason })?;
        trace_engine!("peripheral powered up");
        Ok(())
    }

    fn supports(&self, algorithm: Algorithm) -> bool {
        self.peripheral.supports(algorithm)
    }

    fn seed(&mut self, algorithm: Algorithm, state: &[u32]) -> EngineResult<()> {
        if state.len() != algorithm.state_words() {
            return Err(EngineError::StateWidth {
                expected: algorithm.state_words(),
                actual: state.len(),
            });
        }
        self.peripheral.init(algorithm);
        for (index, word) in state.iter().enumerate() {
            self.peripheral.write_seed(index, *word);
            self.peripheral.write_live(index, *word);
        }
        self.selected = Some(algorithm);
        Ok(())
    }

    fn absorb(&mut self, blocks: &[u8]) -> EngineResult<()> {
        let algorithm = self.selected()?;
        let (chunks, rest) = blocks.as_chunks::<BLOCK_SIZE>();
        if !rest.is_empty() {
            return Err(EngineError::Misaligned {
                len: blocks.len(),
                block_size: BLOCK_SIZE,
            });
        }

        for block in chunks {
            let (words, _) = block.as_chunks::<4>();
            let mut words = words.iter().map(|bytes| u32::from_le_bytes(*bytes));
            if let Some(first) = words.next() {
                self.peripheral.write_data(first);
            }
            self.wait_idle(algorithm)?;
            words.for_each(|word| self.peripheral.write_data(word));
        }
        Ok(())
    }

    fn flush(&mut self, state: &mut [u32]) -> EngineResult<()> {
        let algorithm = self.selected()?;
        if state.len() != algorithm.state_words() {
            return Err(EngineError::StateWidth {
                expected: algorithm.state_words(),
                actual: state.len(),
            });
        }

        self.peripheral.write_data(0);
        self.wait_idle(algorithm)?;
        for (index, word) in state.iter_mut().enumerate() {
            *word = self.peripheral.read_live(index);
        }
        self.selected = None;
        Ok(())
    }
}
