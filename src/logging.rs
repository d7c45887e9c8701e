//! Logging configuration for cmdtree.
//!
//! Logs go to stderr so that stdout only carries resolution output.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

/// Initializes logging to stderr.
///
/// Honours `RUST_LOG`; `verbose` lowers the fallback filter to `debug`.
pub fn init_stderr_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { DEFAULT_FILTER };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}
