//! Bridge between the tracing crate and the accel-hash verbosity system.
//!
//! Library crates emit ordinary `tracing` events under the `accel::*`
//! targets (see the `trace_*!` macros). [`HashLayer`] maps those targets onto
//! [`DebugFlag`]/[`InfoFlag`] and records the events that pass the current
//! thread's verbosity into the thread-local event buffer, so tests and
//! front ends can inspect them with [`drain_events`](crate::drain_events).
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2));
//! tracing::debug!(target: "accel::engine", "ran 4 blocks");
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use super::thread_local::{debug_gte, emit_debug, emit_info, info_gte};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Target prefix shared by every accel-hash tracing event.
pub const TARGET_PREFIX: &str = "accel";

/// A tracing layer that bridges tracing events to the verbosity flags.
pub struct HashLayer {
    _config: VerbosityConfig,
}

impl HashLayer {
    /// Create a new layer with the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { _config: config }
    }

    /// Map a tracing target to an info flag.
    fn target_to_info_flag(target: &str) -> Option<InfoFlag> {
        match target {
            t if t.ends_with("::session") || t == "session" => Some(InfoFlag::Session),
            t if t.ends_with("::stats") || t == "stats" => Some(InfoFlag::Stats),
            _ => None,
        }
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        match target {
            t if t.ends_with("::engine") || t == "engine" => Some(DebugFlag::Engine),
            t if t.ends_with("::lock") || t == "lock" => Some(DebugFlag::Lock),
            t if t.ends_with("::stream") || t == "stream" => Some(DebugFlag::Stream),
            t if t.ends_with("::final") || t == "final" => Some(DebugFlag::Final),
            _ => None,
        }
    }

    /// Map a tracing level to a verbosity level.
    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO | Level::DEBUG => 1,
            Level::TRACE => 2,
        }
    }
}

impl<S> Layer<S> for HashLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        let verbosity_level = Self::level_to_verbosity_level(metadata.level());

        if let Some(debug_flag) = Self::target_to_debug_flag(target) {
            if debug_gte(debug_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.message {
                    emit_debug(debug_flag, verbosity_level, message);
                }
            }
            return;
        }

        if let Some(info_flag) = Self::target_to_info_flag(target) {
            if info_gte(info_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.message {
                    emit_info(info_flag, verbosity_level, message);
                }
            }
        }
    }
}

/// Visitor to extract message from tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

impl VerbosityConfig {
    /// Renders the configuration as `EnvFilter` directives.
    ///
    /// Flags at level 0 are omitted. Debug flags at level 1 admit `debug`
    /// events, level 2 and above admit `trace`. Info flags admit `info` at
    /// level 1 and `trace` above that.
    pub fn filter_directives(&self) -> String {
        let debug = DebugFlag::ALL.into_iter().filter_map(|flag| {
            let level = match self.debug.get(flag) {
                0 => return None,
                1 => "debug",
                _ => "trace",
            };
            Some(format!("{TARGET_PREFIX}::{}={level}", flag.name()))
        });
        let info = InfoFlag::ALL.into_iter().filter_map(|flag| {
            let level = match self.info.get(flag) {
                0 => return None,
                1 => "info",
                _ => "trace",
            };
            Some(format!("{TARGET_PREFIX}::{}={level}", flag.name()))
        });

        debug.chain(info).collect::<Vec<_>>().join(",")
    }
}

/// Initialize tracing with the verbosity configuration.
///
/// Installs [`HashLayer`] on a fresh registry and seeds the thread-local
/// configuration. Panics if a global subscriber is already installed.
pub fn init_tracing(config: VerbosityConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    let layer = HashLayer::new(config);

    tracing_subscriber::registry().with(layer).init();
}

/// Initialize tracing with an extra layer (typically a filtered `fmt` layer)
/// in front of [`HashLayer`].
///
/// ```rust,ignore
/// use logging::{VerbosityConfig, init_tracing_with_filter};
/// use tracing_subscriber::{fmt, EnvFilter, Layer};
///
/// let config = VerbosityConfig::from_verbose_level(2);
/// let filter = EnvFilter::new(config.filter_directives());
/// init_tracing_with_filter(config, fmt::layer().with_filter(filter));
/// ```
pub fn init_tracing_with_filter<F>(config: VerbosityConfig, filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    let layer = HashLayer::new(config);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{drain_events, init, DiagnosticEvent};
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_target_to_info_flag() {
        assert_eq!(
            HashLayer::target_to_info_flag("accel::session"),
            Some(InfoFlag::Session)
        );
        assert_eq!(
            HashLayer::target_to_info_flag("accel::stats"),
            Some(InfoFlag::Stats)
        );
        assert_eq!(HashLayer::target_to_info_flag("unknown"), None);
    }

    #[test]
    fn test_target_to_debug_flag() {
        assert_eq!(
            HashLayer::target_to_debug_flag("accel::engine"),
            Some(DebugFlag::Engine)
        );
        assert_eq!(
            HashLayer::target_to_debug_flag("accel::lock"),
            Some(DebugFlag::Lock)
        );
        assert_eq!(
            HashLayer::target_to_debug_flag("accel::final"),
            Some(DebugFlag::Final)
        );
        assert_eq!(HashLayer::target_to_debug_flag("accel::locksmith"), None);
        assert_eq!(HashLayer::target_to_debug_flag("unknown"), None);
    }

    #[test]
    fn test_level_to_verbosity_level() {
        assert_eq!(HashLayer::level_to_verbosity_level(&Level::ERROR), 1);
        assert_eq!(HashLayer::level_to_verbosity_level(&Level::INFO), 1);
        assert_eq!(HashLayer::level_to_verbosity_level(&Level::DEBUG), 1);
        assert_eq!(HashLayer::level_to_verbosity_level(&Level::TRACE), 2);
    }

    #[test]
    fn test_filter_directives() {
        let mut config = VerbosityConfig::default();
        assert_eq!(config.filter_directives(), "");

        config.debug.engine = 1;
        config.debug.lock = 2;
        config.info.stats = 1;
        assert_eq!(
            config.filter_directives(),
            "accel::engine=debug,accel::lock=trace,accel::stats=info"
        );
    }

    #[test]
    fn layer_records_enabled_events_only() {
        let mut config = VerbosityConfig::default();
        config.debug.engine = 1;
        init(config.clone());
        drain_events();

        let subscriber = tracing_subscriber::registry().with(HashLayer::new(config));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "accel::engine", "ran 2 blocks");
            tracing::trace!(target: "accel::engine", "too verbose");
            tracing::trace!(target: "accel::lock", "lock is off");
        });

        let events = drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DiagnosticEvent::Debug { flag: DebugFlag::Engine, level: 1, message } if message == "ran 2 blocks"
        ));
    }
}
