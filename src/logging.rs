//! Structured logging for the stubbing engine.
//!
//! The engine reports what it registers and dispatches through `tracing`;
//! it never logs the errors it returns, those belong to the caller.

use crate::InvocationExpectation;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_FILTER_ENV: &str = "CALLSTUB_LOG";

/// When set, events are written as JSON lines
pub const LOG_JSON_ENV: &str = "CALLSTUB_LOG_JSON";

/// Install a stderr subscriber for test runs.
///
/// The filter comes from `CALLSTUB_LOG` and falls back to `callstub=<level>`.
/// Only the first call in a process installs anything, later calls are
/// no-ops, so every test may call it.
pub fn init_subscriber(level: &str) {
    let fallback_filter = format!("callstub={},callstub_mock={}", level, level);
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| fallback_filter.into());

    let result = if std::env::var(LOG_JSON_ENV).is_ok() {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_test_writer()
            .with_target(true)
            .with_level(true);
        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_level(true);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    };

    if result.is_err() {
        tracing::trace!("Subscriber already installed");
    }
}

/// Log creation of an operation mock.
pub fn log_operation_created(operation: &str, signature: &str, seeded: bool) {
    tracing::debug!(operation, signature, seeded, "Operation mock created");
}

/// Log a new exact expectation.
pub fn log_stub_registered<A, R>(
    operation: &str,
    expectation: &InvocationExpectation<A, R>,
    position: usize,
) {
    tracing::debug!(
        operation,
        expectation = %expectation.describe(),
        position,
        "Exact expectation registered"
    );
}

/// Log re-stubbing that found an existing exact expectation.
pub fn log_stub_extended<A, R>(
    operation: &str,
    expectation: &InvocationExpectation<A, R>,
    position: usize,
) {
    tracing::debug!(
        operation,
        expectation = %expectation.describe(),
        position,
        "Existing expectation extended"
    );
}

pub fn log_default_registered(operation: &str, position: usize) {
    tracing::debug!(operation, position, "Default expectation registered");
}

pub fn log_predicate_registered(operation: &str, position: usize) {
    tracing::debug!(operation, position, "Predicate expectation registered");
}

/// Log which expectation answered a call.
pub fn log_call_dispatched<A, R>(
    operation: &str,
    call: usize,
    expectation: &InvocationExpectation<A, R>,
    position: usize,
) {
    tracing::trace!(
        operation,
        call,
        expectation = %expectation.describe(),
        position,
        "Call dispatched"
    );
}

/// Log a call that no expectation answered.
pub fn log_call_unmatched(operation: &str, arguments: &str) {
    tracing::warn!(operation, arguments, "No behavior found for call");
}

pub fn log_history_query(operation: &str, matched: usize, total: usize) {
    tracing::trace!(operation, matched, total, "History queried");
}

pub fn log_expectations_cleared(operation: &str, count: usize) {
    tracing::debug!(operation, count, "Expectations cleared");
}

pub fn log_history_cleared(operation: &str, count: usize) {
    tracing::debug!(operation, count, "History cleared");
}

/// Log configuration loading.
pub fn log_config_loaded(path: &str) {
    tracing::info!(path, "Configuration loaded");
}
