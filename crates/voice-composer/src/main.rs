//! Voice Composer: record, preview and send voice messages from a terminal.

mod app;
mod app_command;
mod config;
mod error;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "voice_composer=debug,voice_composer_core=debug";

/// Application entry point.
fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    // cpal streams are !Send on some platforms, so everything audio stays
    // on this thread.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(async {
        let app = App::from_config(&config)?;
        app.run().await
    });

    // The stdin forwarder may still be blocked on a read.
    rt.shutdown_background();

    if let Err(e) = result {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}
