//! Shared helpers for maxpar's integration tests.

pub mod builders;
pub mod probe;
pub mod scenario;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use maxpar::logging::LOG_ENV_VAR;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// How long [`with_timeout`] lets a run take before failing the test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a test-writer subscriber once per test binary.
///
/// The filter is read from `MAXPAR_LOG`, then `RUST_LOG`, and defaults to
/// `warn` so passing runs stay quiet:
///
/// `MAXPAR_LOG=maxpar=debug cargo test -- --nocapture`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = test_filter(
            std::env::var(LOG_ENV_VAR).ok(),
            std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        );

        // Another harness may have installed a global subscriber already.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

fn test_filter(crate_var: Option<String>, rust_log: Option<String>) -> EnvFilter {
    crate_var
        .or(rust_log)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
///
/// A stalled scheduler then fails the test instead of hanging the suite.
pub async fn with_timeout<F: Future>(f: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(output) => output,
        Err(_) => panic!("run did not finish within {TEST_TIMEOUT:?}"),
    }
}
