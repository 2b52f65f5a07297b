//! Diagnostic tracing for debugging `gitusers`.
//!
//! Output goes to stderr only: stdout carries the prompt string and must stay
//! clean when the binary is embedded in a shell prompt.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Env var read before `RUST_LOG`.
pub const LOG_ENV: &str = "GITUSERS_LOG";

/// Initialize the tracing subscriber.
///
/// Reads `GITUSERS_LOG`, then `RUST_LOG`. Defaults to `warn` if neither is set.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// GITUSERS_LOG=gitusers=debug gitusers -p
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
