use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; widgets log fetch
/// failures at `warn` and lifecycle details at `debug`. When debug logging is
/// requested the `RUST_LOG` environment variable may override the filter.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        // Ignore RUST_LOG here so a stray environment variable cannot turn on
        // verbose output for a regular run.
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
