//! Logging for tests.

use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test writer so it only shows for
/// failing tests. `RUST_LOG` wins over `filter` when set. Later calls are
/// no-ops.
pub fn setup_test_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// [`setup_test_logging`] with the router and dispatcher at `debug`, so
/// policy violations and dropped links show up in failure output.
pub fn setup_test_logging_default() {
    setup_test_logging("warn,cadence_protocol=debug,cadence_deeplink=debug");
}
