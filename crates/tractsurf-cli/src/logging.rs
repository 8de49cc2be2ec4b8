//! Subscriber setup for the binary.

use tracing_subscriber::{fmt, EnvFilter};
use tractsurf_engine::Verbosity;

/// The filter for `verbosity`, unless `RUST_LOG` is set.
pub fn filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(verbosity: Verbosity) {
    let _ = fmt()
        .with_env_filter(filter(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
