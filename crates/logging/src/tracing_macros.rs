//! Convenience macros for accel-hash tracing.
//!
//! Each macro wraps a standard tracing macro with the target that
//! [`HashLayer`](crate::HashLayer) maps onto a verbosity flag.

/// Emit a block engine trace.
///
/// # Example
/// ```ignore
/// trace_engine!("ran {} blocks", count);
/// ```
#[macro_export]
macro_rules! trace_engine {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "accel::engine", $($arg)*);
    };
}

/// Emit an engine lock trace.
///
/// # Example
/// ```ignore
/// trace_lock!("released after {:?}", held);
/// ```
#[macro_export]
macro_rules! trace_lock {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "accel::lock", $($arg)*);
    };
}

/// Emit an accumulator buffering trace.
///
/// # Example
/// ```ignore
/// trace_stream!("forwarding {} bytes", n);
/// ```
#[macro_export]
macro_rules! trace_stream {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "accel::stream", $($arg)*);
    };
}

/// Emit a finalization trace.
///
/// # Example
/// ```ignore
/// trace_final!("padding {} bytes into {} blocks", buffered, blocks);
/// ```
#[macro_export]
macro_rules! trace_final {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "accel::final", $($arg)*);
    };
}

/// Emit a session lifecycle trace.
///
/// # Example
/// ```ignore
/// trace_session!("finalized {} bytes", total);
/// ```
#[macro_export]
macro_rules! trace_session {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "accel::session", $($arg)*);
    };
}

/// Emit a statistics trace.
///
/// # Example
/// ```ignore
/// trace_stats!("{} runs, {} blocks", runs, blocks);
/// ```
#[macro_export]
macro_rules! trace_stats {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "accel::stats", $($arg)*);
    };
}
