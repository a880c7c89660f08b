use tracing_subscriber::{EnvFilter, fmt};

/// Installs a stderr subscriber filtered by `RUST_LOG`, falling back to `default_level`.
/// Standard output is left to the binaries' results.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second initialization (tests, embedding applications) keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
