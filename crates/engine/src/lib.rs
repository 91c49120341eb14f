#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` owns the fixed-block side of accel-hash: the [`BlockEngine`]
//! contract, the [`EngineLock`] that serialises access to one engine, and
//! the [`SharedEngine`] handle that sessions hold.
//!
//! # Design
//!
//! A run is one seed, absorb and flush cycle over whole 64-byte blocks. The
//! engine keeps no session identity between runs; every run re-seeds both
//! state banks from the caller's carried-over state. [`SharedEngine`] is the
//! only public path that drives a backend, and it holds the lock for exactly
//! one run.
//!
//! Backends:
//!
//! - [`SoftwareEngine`] runs the compression functions directly.
//! - [`PeripheralEngine`] drives a [`HashPeripheral`] register by register;
//!   [`SimulatedPeripheral`] models one in memory.
//! - [`RecordingEngine`] wraps another engine and logs each run.
//!
//! # Examples
//!
//! ```
//! use engine::{Algorithm, EngineConfig, SharedEngine, SoftwareEngine};
//!
//! let engine = SharedEngine::new(SoftwareEngine::new(), EngineConfig::default()).unwrap();
//! let mut state = Algorithm::Sha256.initial_state().to_vec();
//! engine.process_blocks(Algorithm::Sha256, &mut state, &[0u8; 64]).unwrap();
//! assert_eq!(engine.stats().blocks, 1);
//! ```

mod algorithm;
mod backend;
mod compress;
mod config;
mod error;
mod lock;
mod shared;

pub use algorithm::{
    Algorithm, BLOCK_SIZE, MAX_DIGEST_LEN, MAX_STATE_WORDS, ParseAlgorithmError, WordOrder,
};
pub use backend::{
    BlockEngine, HashPeripheral, Invocation, InvocationLog, PeripheralEngine, PeripheralFault,
    RecordingEngine, SimulatedPeripheral, SoftwareEngine, check_run,
};
pub use compress::compress_blocks;
pub use config::{ConfigError, EngineConfig, EngineConfigBuilder};
pub use error::{EngineError, EngineResult, FaultReason};
pub use lock::{EngineGuard, EngineLock};
pub use shared::{EngineStats, SharedEngine};
