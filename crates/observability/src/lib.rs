//! Tracing setup shared by binaries and tests.

/// Initialize process-wide tracing (JSON logs).
///
/// Binaries call this first thing in `main` (see `plmgate-check`).
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize tracing for a test harness (human-readable, captured per test).
pub fn init_for_tests() {
    tracing::init_for_tests();
}

/// Subscriber configuration (filters, formats).
pub mod tracing;
