//! Integration tests for `-v` level and `--debug` token mappings.

use logging::{
    DebugFlag, DiagnosticEvent, InfoFlag, VerbosityConfig, apply_debug_flag, apply_info_flag,
    debug_gte, debug_log, drain_events, emit_debug, info_gte, info_log, init,
};

// ============================================================================
// Verbose levels
// ============================================================================

#[test]
fn verbose_level_0_is_silent() {
    init(VerbosityConfig::from_verbose_level(0));

    for flag in InfoFlag::ALL {
        assert!(!info_gte(flag, 1));
    }
    for flag in DebugFlag::ALL {
        assert!(!debug_gte(flag, 1));
    }
}

#[test]
fn verbose_level_1_reports_sessions_only() {
    init(VerbosityConfig::from_verbose_level(1));

    assert!(info_gte(InfoFlag::Session, 1));
    assert!(!info_gte(InfoFlag::Stats, 1));
    assert!(!debug_gte(DebugFlag::Engine, 1));
}

#[test]
fn verbose_level_3_enables_everything_at_two() {
    init(VerbosityConfig::from_verbose_level(3));

    for flag in DebugFlag::ALL {
        assert!(debug_gte(flag, 2), "{flag:?}");
        assert!(!debug_gte(flag, 3), "{flag:?}");
    }
}

// ============================================================================
// Token parsing against the thread-local configuration
// ============================================================================

#[test]
fn debug_tokens_raise_single_flags() {
    init(VerbosityConfig::default());
    apply_debug_flag("lock2").unwrap();
    apply_info_flag("stats").unwrap();

    assert!(debug_gte(DebugFlag::Lock, 2));
    assert!(!debug_gte(DebugFlag::Engine, 1));
    assert!(info_gte(InfoFlag::Stats, 1));
}

#[test]
fn unknown_token_leaves_configuration_alone() {
    init(VerbosityConfig::default());
    assert!(apply_debug_flag("turbo").is_err());
    assert_eq!(logging::current(), VerbosityConfig::default());
}

// ============================================================================
// Event collection
// ============================================================================

#[test]
fn emitted_events_respect_levels() {
    let mut config = VerbosityConfig::default();
    config.debug.stream = 1;
    config.info.session = 1;
    init(config);
    drain_events();

    debug_log!(Stream, 1, "buffering {} bytes", 3);
    debug_log!(Stream, 2, "too detailed");
    debug_log!(Lock, 1, "lock off");
    info_log!(Session, 1, "{} session started", "md5");

    let messages: Vec<String> = drain_events()
        .iter()
        .map(|event| event.message().to_owned())
        .collect();
    assert_eq!(messages, ["buffering 3 bytes", "md5 session started"]);
    assert!(drain_events().is_empty());
}

#[test]
fn events_stay_on_their_thread() {
    let mut config = VerbosityConfig::default();
    config.debug.engine = 1;
    init(config.clone());
    drain_events();

    std::thread::spawn(move || {
        init(config);
        emit_debug(DebugFlag::Engine, 1, "worker".into());
        assert_eq!(drain_events().len(), 1);
    })
    .join()
    .unwrap();

    assert!(drain_events().is_empty());
    emit_debug(DebugFlag::Engine, 1, "main".into());
    assert!(matches!(
        drain_events().as_slice(),
        [DiagnosticEvent::Debug { flag: DebugFlag::Engine, .. }]
    ));
}
