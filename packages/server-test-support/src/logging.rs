//! Test logging bootstrap.
//!
//! One subscriber per test process, installed lazily by whichever test runs
//! first. Unit tests call it from a `ctor` in the server crate; integration
//! binaries call it from `tests/common`.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install the test subscriber. Safe to call any number of times.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
/// Setting `TEST_LOG_JSON=1` switches to the JSON layout used in production,
/// which is handy when checking structured fields such as `guid` or
/// `player_id`.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let json = std::env::var("TEST_LOG_JSON").is_ok_and(|v| v == "1");

        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer() // cargo/nextest capture
            .without_time();

        // try_init: another harness may already own the global subscriber
        if json {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}
