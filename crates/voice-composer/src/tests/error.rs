use crate::{AppCommand, AppError, config::Config};

use std::panic::Location;

use error_location::ErrorLocation;
use tempfile::TempDir;
use voice_composer_core::VoiceError;

/// Every variant, by the path that produces it.
fn variant(error: &AppError) -> &'static str {
    match error {
        AppError::Voice { .. } => "voice",
        AppError::InvalidCommand { .. } => "invalid_command",
        AppError::ConfigError { .. } => "config",
        AppError::IoError { .. } => "io",
    }
}

/// WHAT: Each AppError variant has a producer in the app
/// WHY: Variants nothing constructs are dead API surface
#[test]
fn given_app_failure_paths_when_triggered_then_every_variant_produced() {
    // Given: A temp dir holding a malformed config file
    let dir = TempDir::new().unwrap();
    let bad_config = dir.path().join("config.toml");
    std::fs::write(&bad_config, "[recording\nmax_duration_secs = ").unwrap();

    // When: Triggering each failure path
    let voice: AppError = VoiceError::Interrupted {
        location: ErrorLocation::from(Location::caller()),
    }
    .into();
    let command = "launch".parse::<AppCommand>().unwrap_err();
    let config = Config::load_from(&bad_config).unwrap_err();
    let io: AppError = std::fs::read(dir.path().join("missing.wav")).unwrap_err().into();

    // Then: One error per variant, each with its message
    let produced: Vec<&str> = [&voice, &command, &config, &io].into_iter().map(variant).collect();
    assert_eq!(produced, vec!["voice", "invalid_command", "config", "io"]);
    assert!(command.to_string().contains("launch"));
}
