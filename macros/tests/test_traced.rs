use commonware_macros::test_traced;
use tracing::{debug, error, info, trace, Level};

#[test_traced("INFO")]
fn test_info_filters_debug() {
    info!(len = 3, "decoded sequence");
    assert!(tracing::enabled!(Level::INFO));
    assert!(!tracing::enabled!(Level::DEBUG));
}

#[test_traced]
fn test_defaults_to_debug() {
    debug!(id = 65, "registered kind");
    assert!(tracing::enabled!(Level::DEBUG));
    assert!(!tracing::enabled!(Level::TRACE));
}

#[test_traced("ERROR")]
fn test_error_only() {
    error!("handler failed");
    assert!(!tracing::enabled!(Level::WARN));
}

#[test_traced("trace")]
fn test_level_is_case_insensitive() {
    trace!(ty = "Meters", "resolved kind by capability");
    assert!(tracing::enabled!(Level::TRACE));
}

#[test_traced]
#[should_panic(expected = "kind 64 is reserved")]
fn test_panic_propagates() {
    debug!("registering reserved id");
    panic!("kind 64 is reserved");
}
