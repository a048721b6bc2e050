//! Logging setup for the registrar binary.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber.
///
/// The filter is read from `RUST_LOG`; without it, `info` and above are
/// logged. Calling this more than once keeps the first subscriber.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    // A second install fails only because a subscriber is already set.
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
