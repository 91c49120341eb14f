//! Thread-local storage for verbosity configuration and event collection.

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use std::cell::RefCell;

thread_local! {
    static VERBOSITY: RefCell<VerbosityConfig> = RefCell::new(VerbosityConfig::default());
    #[allow(clippy::missing_const_for_thread_local)]
    static EVENTS: RefCell<Vec<DiagnosticEvent>> = RefCell::new(Vec::new());
}

/// Diagnostic event collected during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// Info-level diagnostic event.
    Info {
        /// The info flag category.
        flag: InfoFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
    /// Debug-level diagnostic event.
    Debug {
        /// The debug flag category.
        flag: DebugFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
}

impl DiagnosticEvent {
    /// Returns the rendered message.
    pub fn message(&self) -> &str {
        match self {
            Self::Info { message, .. } | Self::Debug { message, .. } => message,
        }
    }
}

/// Initialize verbosity configuration for the current thread.
pub fn init(config: VerbosityConfig) {
    VERBOSITY.with(|v| {
        *v.borrow_mut() = config;
    });
}

/// Returns a copy of the current thread's configuration.
pub fn current() -> VerbosityConfig {
    VERBOSITY.with(|v| v.borrow().clone())
}

/// Check if the info flag is at or above the specified level.
pub fn info_gte(flag: InfoFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().info.get(flag) >= level)
}

/// Check if the debug flag is at or above the specified level.
pub fn debug_gte(flag: DebugFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().debug.get(flag) >= level)
}

/// Emit an info diagnostic event.
pub fn emit_info(flag: InfoFlag, level: u8, message: String) {
    EVENTS.with(|e| {
        e.borrow_mut().push(DiagnosticEvent::Info {
            flag,
            level,
            message,
        });
    });
}

/// Emit a debug diagnostic event.
pub fn emit_debug(flag: DebugFlag, level: u8, message: String) {
    EVENTS.with(|e| {
        e.borrow_mut().push(DiagnosticEvent::Debug {
            flag,
            level,
            message,
        });
    });
}

/// Drain all collected events, clearing the internal buffer.
pub fn drain_events() -> Vec<DiagnosticEvent> {
    EVENTS.with(|e| e.borrow_mut().drain(..).collect())
}

/// Apply an info flag token to the current configuration.
pub fn apply_info_flag(token: &str) -> Result<(), String> {
    VERBOSITY.with(|v| v.borrow_mut().apply_info_flag(token))
}

/// Apply a debug flag token to the current configuration.
pub fn apply_debug_flag(token: &str) -> Result<(), String> {
    VERBOSITY.with(|v| v.borrow_mut().apply_debug_flag(token))
}

/// Emit a debug event when the flag is enabled at `level`.
///
/// ```
/// use logging::{debug_log, drain_events, init, VerbosityConfig};
///
/// let mut config = VerbosityConfig::default();
/// config.debug.lock = 1;
/// init(config);
///
/// debug_log!(Lock, 1, "acquired after {} spins", 3);
/// assert_eq!(drain_events()[0].message(), "acquired after 3 spins");
/// ```
#[macro_export]
macro_rules! debug_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {
        if $crate::debug_gte($crate::DebugFlag::$flag, $level) {
            $crate::emit_debug($crate::DebugFlag::$flag, $level, format!($($arg)*));
        }
    };
}

/// Emit an info event when the flag is enabled at `level`.
#[macro_export]
macro_rules! info_log {
    ($flag:ident, $level:expr, $($arg:tt)*) => {
        if $crate::info_gte($crate::InfoFlag::$flag, $level) {
            $crate::emit_info($crate::InfoFlag::$flag, $level, format!($($arg)*));
        }
    };
}
