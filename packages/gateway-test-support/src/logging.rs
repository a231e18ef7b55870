//! Test logging bootstrap for the gateway crates.
//!
//! Unit tests and the integration suites under `apps/gateway/tests` share one
//! global subscriber. Whichever test calls [`init`] first installs it; later
//! calls are no-ops.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Filter used when neither `TEST_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_TEST_FILTER: &str = "warn";

/// Initialize structured logging for tests.
///
/// Idempotent and race-safe: concurrent tests may all call it, and a
/// subscriber installed by someone else is left in place. The filter comes
/// from the first of these that is set:
///
/// 1. `TEST_LOG`, e.g. `TEST_LOG=gateway=debug` to watch the auth gate
/// 2. `RUST_LOG`
/// 3. [`DEFAULT_TEST_FILTER`]
///
/// Setting `TEST_LOG_JSON=1` switches to the JSON lines the gateway binary
/// emits, which is handy when checking fields such as `event` or `token_fp`
/// on security events.
///
/// Output goes through the test writer so cargo captures it per test, and
/// timestamps are dropped to keep captured output stable.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time();

        // A subscriber may already be installed by the test harness.
        if json_requested() {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}

fn json_requested() -> bool {
    std::env::var("TEST_LOG_JSON")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
