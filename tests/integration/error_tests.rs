//! Integration tests for error reporting and failure propagation

use callstub::{signature_of, Behavior, OperationMock, StubError};
use miette::Diagnostic;
use std::panic::{self, AssertUnwindSafe};

#[test]
fn test_no_matching_behavior_carries_call_details() {
    let mut mock: OperationMock<(String, bool), u32> = OperationMock::strict("lookup");
    let err = mock.handle_call(("key".to_string(), true)).unwrap_err();

    assert_eq!(
        err.to_string(),
        "No behavior matches call to `lookup` with arguments (\"key\", true)"
    );
    assert_eq!(
        err.code().map(|code| code.to_string()),
        Some("callstub::no_matching_behavior".to_string())
    );
    match err {
        StubError::NoMatchingBehavior { signature, .. } => {
            assert_eq!(signature, signature_of::<(String, bool), u32>());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_stub_on_strict_mock_only_covers_its_arguments() {
    let mut mock: OperationMock<(u8,), u8> = OperationMock::strict("decode");
    mock.stub((1,)).append(Behavior::returning(100));

    assert_eq!(mock.handle_call((1,)).unwrap(), 100);
    assert!(matches!(
        mock.handle_call((2,)),
        Err(StubError::NoMatchingBehavior { .. })
    ));
}

#[test]
fn test_errors_in_return_type_pass_through() {
    #[derive(Debug, Clone, PartialEq)]
    enum FetchError {
        Timeout,
    }

    let mut mock: OperationMock<(u32,), Result<String, FetchError>> =
        OperationMock::new("fetch", Behavior::returning(Ok("body".to_string())));
    mock.stub((404,))
        .append(Behavior::returning(Err(FetchError::Timeout)));

    assert_eq!(mock.handle_call((1,)).unwrap(), Ok("body".to_string()));
    assert_eq!(mock.handle_call((404,)).unwrap(), Err(FetchError::Timeout));
}

#[test]
fn test_panicking_behavior_unwinds_to_caller() {
    let mut mock: OperationMock<(u8,), u8> = OperationMock::with_default_value("flaky");
    mock.stub((0,))
        .append(Behavior::panicking("disk on fire"))
        .append(Behavior::returning(1));

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| mock.handle_call((0,))));
    let payload = outcome.unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("disk on fire"));

    // The panicking call was recorded and consumed its behavior.
    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.handle_call((0,)).unwrap(), 1);
}

#[test]
fn test_cleared_mock_reports_no_match() {
    let mut mock: OperationMock<(), ()> = OperationMock::with_default_value("noop");
    assert!(mock.handle_call(()).is_ok());
    mock.clear_expectations();
    assert!(matches!(
        mock.handle_call(()),
        Err(StubError::NoMatchingBehavior { .. })
    ));
}
