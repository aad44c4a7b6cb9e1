//! Minimal `tracing` setup for command-line tools.

use tracing_subscriber::EnvFilter;

/// Install a plain `fmt` subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies. Safe to call
/// more than once: later calls are ignored.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
