//! Runs the registrar user service.
//!
//! Reads its settings from the environment (see [`registrar::config`]),
//! optionally seeded from a `.env` file, connects to `PostgreSQL` and serves
//! `SignUp` and `GetUser` calls until SIGINT or SIGTERM.

use registrar::{app, config::ServiceConfig, telemetry};
use std::future::Future;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = dotenvy::dotenv();
    telemetry::init();
    match env_file {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "ignoring unreadable environment file"),
    }

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let service = match app::bootstrap(&config).await {
        Ok(service) => service,
        Err(err) => {
            error!(error = %err, "failed to start");
            return ExitCode::FAILURE;
        }
    };

    let signal = match shutdown_signal() {
        Ok(signal) => signal,
        Err(err) => {
            error!(error = %err, "failed to install shutdown signal handlers");
            service.database().notify_exit();
            service.run().await;
            return ExitCode::FAILURE;
        }
    };

    let database = Arc::clone(service.database());
    tokio::spawn(async move {
        if let Err(err) = app::exit_on_signal(&database, signal).await {
            error!(error = %err, "failed to listen for shutdown signals");
        }
    });

    service.run().await;
    ExitCode::SUCCESS
}

#[cfg(unix)]
fn shutdown_signal() -> io::Result<impl Future<Output = io::Result<()>>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> io::Result<impl Future<Output = io::Result<()>>> {
    Ok(tokio::signal::ctrl_c())
}
