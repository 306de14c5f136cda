//! Tracing subscriber setup
//!
//! `RUST_LOG` controls the filter in both cases; the server defaults to
//! `info`, tests default to `warn` (override with `TEST_LOG`).

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static TEST_LOGGING: OnceCell<()> = OnceCell::new();

/// Installs the global subscriber for the server process
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}

/// Installs a subscriber writing through the test harness; safe to call
/// from every test
pub fn init_test() {
    TEST_LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
