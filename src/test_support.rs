use tracing_subscriber::EnvFilter;

/// Routes `tracing` output of the code under test to the test harness.
/// Filtered by `RUST_LOG`; safe to call from every test.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
