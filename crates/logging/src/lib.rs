#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the diagnostic plumbing shared by the accel-hash
//! workspace: per-category verbosity flags, a thread-local event collector,
//! and (behind the `tracing` feature) a bridge that routes `tracing` events
//! onto those flags.
//!
//! # Design
//!
//! Library code never prints. The engine and checksums crates emit `tracing`
//! events through the `trace_*!` macros, each bound to one `accel::*`
//! target. Front ends pick a [`VerbosityConfig`] (from a `-v` count or
//! `--debug=lock2,engine` style tokens), install it with
//! [`init_tracing`] or [`init_tracing_with_filter`], and either render the
//! events with a formatting layer or collect them with [`drain_events`].
//!
//! # Examples
//!
//! ```
//! use logging::{DebugFlag, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::from_verbose_level(1);
//! config.apply_debug_list("lock2,engine").unwrap();
//! assert_eq!(config.debug.get(DebugFlag::Lock), 2);
//! assert_eq!(config.debug.get(DebugFlag::Engine), 1);
//! ```

mod config;
mod levels;
mod thread_local;
mod tracing_macros;

#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
mod tracing_bridge;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use thread_local::{
    DiagnosticEvent, apply_debug_flag, apply_info_flag, current, debug_gte, drain_events,
    emit_debug, emit_info, info_gte, init,
};

#[cfg(feature = "tracing")]
pub use tracing_bridge::{
    HashLayer, TARGET_PREFIX, init_tracing, init_tracing_with_filter,
};
