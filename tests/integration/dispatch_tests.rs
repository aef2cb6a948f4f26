//! Integration tests for stubbing and call dispatch

use callstub::{Behavior, InvocationExpectation, OperationMock};

// ── Default seeding ─────────────────────────────────────────────────

#[test]
fn test_seeded_default_answers_unstubbed_calls() {
    let mut mock: OperationMock<(String, u16), String> =
        OperationMock::new("greet", Behavior::returning("hello".to_string()));

    for (name, port) in [("a", 1), ("b", 2), ("", u16::MAX)] {
        let answer = mock.handle_call((name.to_string(), port)).unwrap();
        assert_eq!(answer, "hello");
    }
    assert_eq!(mock.expectations().len(), 1);
    assert!(mock.expectations()[0].is_default());
}

#[test]
fn test_default_value_constructor() {
    let mut mock: OperationMock<(u8, u8), Vec<u8>> = OperationMock::with_default_value("bytes");
    assert!(mock.handle_call((1, 2)).unwrap().is_empty());
}

#[test]
fn test_zero_argument_operation() {
    let mut mock: OperationMock<(), u64> = OperationMock::with_default_value("now");
    mock.stub(()).append(Behavior::returning(1_000));
    assert_eq!(mock.handle_call(()).unwrap(), 1_000);
    assert_eq!(mock.call_count(), 1);
}

// ── Sequencing ──────────────────────────────────────────────────────

#[test]
fn test_end_to_end_scenario() {
    let mut f: OperationMock<(i32,), i32> = OperationMock::new("f", Behavior::returning(0));
    f.stub((5,))
        .append(Behavior::returning(10))
        .append(Behavior::returning(20));

    assert_eq!(f.handle_call((5,)).unwrap(), 10);
    assert_eq!(f.handle_call((5,)).unwrap(), 20);
    assert_eq!(f.handle_call((5,)).unwrap(), 20);
    assert_eq!(f.handle_call((3,)).unwrap(), 0);

    assert_eq!(f.history(|args| *args == (5,)).len(), 3);
    assert_eq!(f.history_of(&(5,)).len(), 3);
}

#[test]
fn test_sequence_one_two_three_then_three_forever() {
    let mut mock: OperationMock<(char,), u8> = OperationMock::with_default_value("code");
    let expectation = mock.stub(('a',));
    for value in [1, 2, 3] {
        expectation.append(Behavior::returning(value));
    }

    let answers: Vec<u8> = (0..7)
        .map(|_| mock.handle_call(('a',)).unwrap())
        .collect();
    assert_eq!(answers, vec![1, 2, 3, 3, 3, 3, 3]);
}

#[test]
fn test_computed_behavior_uses_arguments() {
    let mut mock: OperationMock<(i64, i64), i64> = OperationMock::with_default_value("add");
    mock.stub_default(Behavior::computed(|(a, b): &(i64, i64)| a + b));
    assert_eq!(mock.handle_call((40, 2)).unwrap(), 42);
    assert_eq!(mock.handle_call((-1, 1)).unwrap(), 0);
}

// ── Re-stubbing and shadowing ───────────────────────────────────────

#[test]
fn test_restub_appends_to_single_expectation() {
    let mut mock: OperationMock<(&'static str,), u32> = OperationMock::with_default_value("len");
    mock.stub(("abc",)).append(Behavior::returning(3));
    mock.stub(("abc",)).append(Behavior::returning(30));
    mock.stub(("abc",)).append(Behavior::returning(300));

    // One default plus one exact expectation holding all three answers.
    assert_eq!(mock.expectations().len(), 2);
    assert_eq!(mock.expectations()[1].behaviors().len(), 3);
    assert_eq!(mock.handle_call(("abc",)).unwrap(), 3);
    assert_eq!(mock.handle_call(("abc",)).unwrap(), 30);
    assert_eq!(mock.handle_call(("abc",)).unwrap(), 300);
}

#[test]
fn test_restub_never_extends_default() {
    let mut mock: OperationMock<(u8,), u8> = OperationMock::new("id", Behavior::returning(0));
    mock.stub((1,));

    assert_eq!(mock.expectations().len(), 2);
    assert_eq!(mock.expectations()[0].behaviors().len(), 1);
    assert!(!mock.expectations()[1].is_default());
}

#[test]
fn test_appending_to_one_stub_leaves_others_alone() {
    let mut mock: OperationMock<(u8,), &'static str> =
        OperationMock::new("name", Behavior::returning("?"));
    mock.stub((1,)).append(Behavior::returning("one"));
    mock.stub((2,)).append(Behavior::returning("two"));
    mock.stub((1,)).append(Behavior::returning("uno"));

    assert_eq!(mock.handle_call((1,)).unwrap(), "one");
    assert_eq!(mock.handle_call((2,)).unwrap(), "two");
    assert_eq!(mock.handle_call((1,)).unwrap(), "uno");
    assert_eq!(mock.handle_call((2,)).unwrap(), "two");
    assert_eq!(mock.handle_call((3,)).unwrap(), "?");
}

#[test]
fn test_exact_stub_shadows_older_predicate() {
    let mut mock: OperationMock<(i32,), &'static str> =
        OperationMock::new("sign", Behavior::returning("zero"));
    mock.stub_matching(|(n,): &(i32,)| *n > 0)
        .append(Behavior::returning("positive"));
    mock.stub((7,)).append(Behavior::returning("lucky"));

    assert_eq!(mock.handle_call((7,)).unwrap(), "lucky");
    assert_eq!(mock.handle_call((8,)).unwrap(), "positive");
    assert_eq!(mock.handle_call((0,)).unwrap(), "zero");
}

#[test]
fn test_exact_stub_answers_before_newer_default() {
    let mut mock: OperationMock<(&'static str,), u16> =
        OperationMock::new("port", Behavior::returning(80));
    mock.stub(("https",)).append(Behavior::returning(443));
    mock.stub_default(Behavior::returning(8080));

    assert_eq!(mock.handle_call(("https",)).unwrap(), 443);
    assert_eq!(mock.handle_call(("ftp",)).unwrap(), 8080);

    // Extending the stub after the newer default keeps its precedence.
    mock.stub(("https",)).append(Behavior::returning(8443));
    assert_eq!(mock.handle_call(("https",)).unwrap(), 443);
    assert_eq!(mock.handle_call(("https",)).unwrap(), 8443);
}

#[test]
fn test_registered_custom_expectation() {
    let mut mock: OperationMock<(String,), bool> = OperationMock::with_default_value("is_admin");
    mock.register(InvocationExpectation::matching(|(user,): &(String,)| {
        user.starts_with("root")
    }))
    .append(Behavior::returning(true));

    assert!(mock.handle_call(("root-1".to_string(),)).unwrap());
    assert!(!mock.handle_call(("alice".to_string(),)).unwrap());
}

// ── Arguments without equality ──────────────────────────────────────

struct Token {
    secret: u32,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(..)")
    }
}

#[test]
fn test_arguments_without_equality_use_default_and_predicates() {
    let mut mock: OperationMock<(Token,), bool> = OperationMock::with_default_value("verify");
    mock.stub_matching(|(token,): &(Token,)| token.secret == 42)
        .append(Behavior::returning(true));

    assert!(mock.handle_call((Token { secret: 42 },)).unwrap());
    assert!(!mock.handle_call((Token { secret: 1 },)).unwrap());
    assert_eq!(mock.history(|(token,)| token.secret == 42).len(), 1);
}
