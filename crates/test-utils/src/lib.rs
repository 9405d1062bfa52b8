pub mod builders;
pub mod fake_executor;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Output goes through the harness capture, so it only shows up for failing
/// tests. The default `info` level hides the scheduler's per-task
/// dispatch/resolve events, which flowdag emits at `trace` unless a flow sets
/// `debug`; use `RUST_LOG=flowdag=trace` to see them for every flow.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test if it takes longer than 5 seconds.
///
/// Flow runs in tests use short task timeouts; this guards against a
/// scheduler that never settles.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("flow did not settle within 5 seconds")
}
