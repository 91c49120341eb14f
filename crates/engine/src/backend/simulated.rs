//! Software model of a memory-mapped hash peripheral.
//!
//! The model follows the register behaviour the [`PeripheralEngine`]
//! protocol is written against:
//!
//! * data words are byte streams packed little-endian (8-bit data type), so
//!   the peripheral unpacks each word back into four message bytes;
//! * a complete block is only compressed when the first word of the
//!   following block arrives, which is why every run ends with a flush word;
//! * the first compression after initialisation chains from the seed bank,
//!   later ones from the live bank, and results always land in the live bank.
//!
//! [`PeripheralEngine`]: super::PeripheralEngine

use crate::algorithm::{Algorithm, BLOCK_SIZE, MAX_STATE_WORDS};
use crate::compress::compress_blocks;

use super::HashPeripheral;

const WORDS_PER_BLOCK: usize = BLOCK_SIZE / 4;

/// Faults the simulated peripheral can be told to exhibit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeripheralFault {
    /// Bring-up fails because the peripheral clock never becomes ready.
    NoClock,
    /// The busy flag never clears once `after_blocks` blocks have been
    /// compressed.
    StuckBusy {
        /// Blocks compressed normally before the fault engages.
        after_blocks: u64,
    },
}

/// In-memory hash peripheral with two state banks and deferred compression.
#[derive(Clone, Debug)]
pub struct SimulatedPeripheral {
    powered: bool,
    selected: Option<Algorithm>,
    seed_bank: [u32; MAX_STATE_WORDS],
    live_bank: [u32; MAX_STATE_WORDS],
    pending: [u8; BLOCK_SIZE],
    pending_words: usize,
    chained: bool,
    latency: u32,
    busy_polls_left: u32,
    fault: Option<PeripheralFault>,
    blocks_compressed: u64,
    overruns: u64,
}

impl SimulatedPeripheral {
    /// Creates a peripheral that reports busy for one poll per compression.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            powered: false,
            selected: None,
            seed_bank: [0; MAX_STATE_WORDS],
            live_bank: [0; MAX_STATE_WORDS],
            pending: [0; BLOCK_SIZE],
            pending_words: 0,
            chained: false,
            latency: 1,
            busy_polls_left: 0,
            fault: None,
            blocks_compressed: 0,
            overruns: 0,
        }
    }

    /// Sets how many busy polls each compression takes.
    #[must_use]
    pub const fn with_latency(mut self, polls: u32) -> Self {
        self.latency = polls;
        self
    }

    /// Arms a fault.
    #[must_use]
    pub const fn with_fault(mut self, fault: PeripheralFault) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Total blocks compressed since creation.
    #[must_use]
    pub const fn blocks_compressed(&self) -> u64 {
        self.blocks_compressed
    }

    /// Data words written while the busy flag was still set.
    #[must_use]
    pub const fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Words of the current block received so far.
    #[must_use]
    pub const fn pending_words(&self) -> usize {
        self.pending_words
    }

    fn stuck(&self) -> bool {
        matches!(
            self.fault,
            Some(PeripheralFault::StuckBusy { after_blocks }) if self.blocks_compressed >= after_blocks
        )
    }

    fn compress_pending(&mut self) {
        let Some(algorithm) = self.selected else {
            return;
        };
        let width = algorithm.state_words();
        let mut state = if self.chained {
            self.live_bank
        } else {
            self.seed_bank
        };
        // The pending buffer is exactly one block and the width matches the
        // selected algorithm, so this cannot fail.
        if compress_blocks(algorithm, &mut state[..width], &self.pending).is_ok() {
            self.live_bank = state;
        }
        self.chained = true;
        self.blocks_compressed += 1;
        self.busy_polls_left = self.latency;
    }
}

impl Default for SimulatedPeripheral {
    fn default() -> Self {
        Self::new()
    }
}

impl HashPeripheral for SimulatedPeripheral {
    fn power_up(&mut self) -> Result<(), String> {
        if self.fault == Some(PeripheralFault::NoClock) {
            return Err("peripheral clock not ready".to_owned());
        }
        self.powered = true;
        Ok(())
    }

    fn init(&mut self, algorithm: Algorithm) {
        self.selected = Some(algorithm);
        self.pending_words = 0;
        self.chained = false;
        self.busy_polls_left = 0;
    }

    fn write_seed(&mut self, index: usize, word: u32) {
        if let Some(slot) = self.seed_bank.get_mut(index) {
            *slot = word;
        }
    }

    fn write_live(&mut self, index: usize, word: u32) {
        if let Some(slot) = self.live_bank.get_mut(index) {
            *slot = word;
        }
    }

    fn write_data(&mut self, word: u32) {
        if !self.powered {
            return;
        }
        if self.busy_polls_left > 0 || self.stuck() {
            self.overruns += 1;
        }
        if self.pending_words == WORDS_PER_BLOCK {
            self.compress_pending();
            self.pending_words = 0;
        }
        let offset = self.pending_words * 4;
        self.pending[offset..offset + 4].copy_from_slice(&word.to_le_bytes());
        self.pending_words += 1;
    }

    fn busy(&mut self) -> bool {
        if self.stuck() {
            return true;
        }
        if self.busy_polls_left > 0 {
            self.busy_polls_left -= 1;
            return true;
        }
        false
    }

    fn read_live(&self, index: usize) -> u32 {
        self.live_bank.get(index).copied().unwrap_or(0)
    }
}
