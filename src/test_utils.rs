//! Test helpers: one-shot logging setup and logged assertions.
//!
//! Compiled for unit tests and, behind the `test-internals` feature, for
//! integration tests. Every helper logs through `tracing` so a failing test
//! run with `RUST_LOG=debug` shows the phase it was in and the values it
//! compared.

use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Installs a test-writer `tracing` subscriber exactly once per process.
///
/// Honors `RUST_LOG`; defaults to `debug` for this crate.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("frankenticket=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Marks the start of a named test.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        $crate::tracing_compat::info!(test = %$name, "==== test phase ====");
    };
}

/// Marks a named section inside a test.
#[macro_export]
macro_rules! test_section {
    ($name:expr) => {
        $crate::tracing_compat::debug!(section = %$name, "---- section ----");
    };
}

/// Marks the successful end of a named test.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        $crate::tracing_compat::info!(test = %$name, "==== test complete ====");
    };
}

/// Asserts `cond`, logging the expected and actual values first.
///
/// ```ignore
/// assert_with_log!(len % 16 == 0, "length must be block aligned", 0, len % 16);
/// ```
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {{
        let ok: bool = $cond;
        $crate::tracing_compat::debug!(
            check = %$msg,
            expected = ?$expected,
            actual = ?$actual,
            ok,
            "assertion"
        );
        assert!(
            ok,
            "{}: expected {:?}, got {:?}",
            $msg,
            $expected,
            $actual
        );
    }};
}
