//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`, filtered by `PARKSIM_LOG`
//! (same syntax as `RUST_LOG`, default `warn`). Stdout stays reserved for the
//! interactive session.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "PARKSIM_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Builds the filter from `PARKSIM_LOG`, falling back to `warn` when unset or
/// unparsable.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs the global stderr subscriber. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
