//! Logging macros that set target to "mysql_wire_server" for all log calls.
//!
//! Without an explicit target, tracing uses the full module path
//! (e.g., "mysql_wire_server::server::registry"), which makes filtering an
//! embedding application's output awkward. These macros ensure all logs from
//! this crate use a single "mysql_wire_server" target.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

macro_rules! trace {
    ($($arg:tt)*) => { ::tracing::trace!(target: "mysql_wire_server", $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { ::tracing::debug!(target: "mysql_wire_server", $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { ::tracing::info!(target: "mysql_wire_server", $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { ::tracing::warn!(target: "mysql_wire_server", $($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { ::tracing::error!(target: "mysql_wire_server", $($arg)*) };
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes priority over `level`. Returns `false` when a global
/// subscriber was already installed (e.g. by the embedding application).
pub fn init_tracing(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// [`init_tracing`] at the level named in the `logging` config section.
pub fn init_tracing_from_config(config: &LoggingConfig) -> bool {
    init_tracing(&config.level)
}
