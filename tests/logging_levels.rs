// tests/logging_levels.rs

use rendwatch::cli::LogLevel;
use rendwatch::logging::resolve_level;
use tracing::Level;

#[test]
fn silent_wins_over_everything() {
    assert_eq!(
        resolve_level(Some(LogLevel::Trace), true, Some("debug".into())),
        Level::ERROR
    );
}

#[test]
fn flag_wins_over_environment() {
    assert_eq!(
        resolve_level(Some(LogLevel::Warn), false, Some("trace".into())),
        Level::WARN
    );
}

#[test]
fn environment_then_default() {
    assert_eq!(resolve_level(None, false, Some(" Debug ".into())), Level::DEBUG);
    assert_eq!(resolve_level(None, false, Some("loud".into())), Level::INFO);
    assert_eq!(resolve_level(None, false, None), Level::INFO);
}
