//! Startup helpers for the conversation API server.

use std::process::ExitCode;

use crate::config::Settings;
use crate::server::{self, AppState};

/// Run the server (used by the `parley` binary).
///
/// Configuration is validated before anything is served; an invalid
/// configuration aborts startup.
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Parley Agent v{}", env!("CARGO_PKG_VERSION"));

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };
    tracing::info!("Compute endpoint: {}", settings.compute_url);
    tracing::info!("Conversation data dir: {}", settings.data_dir.display());

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let state = match rt.block_on(AppState::new(&settings)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open conversation store: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::run_server(state, settings.port)) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}
