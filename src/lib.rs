//! Invocation matching and behavior dispatch for test doubles.
//!
//! An [`OperationMock`] stands in for one intercepted operation. Tests stub
//! argument patterns with queues of [`Behavior`]s, the interception layer
//! forwards real calls to [`OperationMock::handle_call`], and every call is
//! kept as an [`ArgumentSnapshot`] for later verification.

pub mod config;
pub mod engine;
pub mod logging;

use miette::Diagnostic;

pub use config::Config;
pub use engine::behavior::{Behavior, BehaviorQueue};
pub use engine::expectation::{
    DefaultMatcher, ExactMatcher, InvocationExpectation, InvocationMatcher, PredicateMatcher,
};
pub use engine::operation::{signature_of, HistoryReport, OperationMock};
pub use engine::snapshot::ArgumentSnapshot;

/// Result type alias for the engine
pub type Result<T, E = StubError> = std::result::Result<T, E>;

/// Error types for the engine
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum StubError {
    #[error("No behavior matches call to `{operation}` with arguments {arguments}")]
    #[diagnostic(
        code(callstub::no_matching_behavior),
        help("Stub these arguments or register a default behavior for the operation before the code under test calls it.")
    )]
    NoMatchingBehavior {
        operation: String,
        signature: &'static str,
        arguments: String,
    },

    #[error("Operation `{operation}` is registered as `{expected}`, but was requested as `{found}`")]
    #[diagnostic(
        code(callstub::signature_mismatch),
        help("Each operation name maps to exactly one signature. Check the argument tuple and return type used at the call site.")
    )]
    SignatureMismatch {
        operation: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(callstub::config_error),
        help("Ensure the configuration file is valid TOML and readable. See `.callstub.toml` for the expected sections.")
    )]
    Config(String),
}
