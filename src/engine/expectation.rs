use super::behavior::{Behavior, BehaviorQueue};
use std::fmt;

/// Decides which calls an expectation claims.
///
/// `matches_actual` is consulted when a real call is dispatched;
/// `matches_expected` only when a test re-stubs arguments and wants to extend
/// an existing expectation instead of registering a duplicate.
pub trait InvocationMatcher<A> {
    fn matches_actual(&self, args: &A) -> bool;

    fn matches_expected(&self, args: &A) -> bool;

    /// Short human readable form used in logs and diagnostics
    fn describe(&self) -> String;

    fn is_default(&self) -> bool {
        false
    }
}

/// Claims calls whose arguments equal a stored tuple.
///
/// Argument types without `Debug` can still be matched exactly; they are
/// described as `<exact>`.
#[derive(Clone)]
pub struct ExactMatcher<A> {
    expected: A,
    render: Option<fn(&A) -> String>,
}

impl<A: PartialEq> ExactMatcher<A> {
    pub fn new(expected: A) -> Self {
        Self {
            expected,
            render: None,
        }
    }

    /// Like [`ExactMatcher::new`], but described by the expected arguments
    pub fn described(expected: A) -> Self
    where
        A: fmt::Debug,
    {
        let render: fn(&A) -> String = |args| format!("{:?}", args);
        Self {
            expected,
            render: Some(render),
        }
    }

    pub fn expected(&self) -> &A {
        &self.expected
    }
}

impl<A: PartialEq> InvocationMatcher<A> for ExactMatcher<A> {
    fn matches_actual(&self, args: &A) -> bool {
        self.expected == *args
    }

    fn matches_expected(&self, args: &A) -> bool {
        self.expected == *args
    }

    fn describe(&self) -> String {
        match self.render {
            Some(render) => render(&self.expected),
            None => "<exact>".to_string(),
        }
    }
}

/// Catch-all: claims every call, but is never found when re-stubbing
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMatcher;

impl<A> InvocationMatcher<A> for DefaultMatcher {
    fn matches_actual(&self, _args: &A) -> bool {
        true
    }

    fn matches_expected(&self, _args: &A) -> bool {
        false
    }

    fn describe(&self) -> String {
        "<any>".to_string()
    }

    fn is_default(&self) -> bool {
        true
    }
}

/// Claims calls accepted by a predicate (partial or wildcard matching).
///
/// Like the default matcher it never matches on re-stubbing, because two
/// predicates cannot be compared for equality.
pub struct PredicateMatcher<F> {
    predicate: F,
}

impl<F> PredicateMatcher<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<A, F> InvocationMatcher<A> for PredicateMatcher<F>
where
    F: Fn(&A) -> bool,
{
    fn matches_actual(&self, args: &A) -> bool {
        (self.predicate)(args)
    }

    fn matches_expected(&self, _args: &A) -> bool {
        false
    }

    fn describe(&self) -> String {
        "<predicate>".to_string()
    }
}

/// An argument matcher paired with the behaviors answering the calls it claims
pub struct InvocationExpectation<A, R> {
    matcher: Box<dyn InvocationMatcher<A>>,
    behaviors: BehaviorQueue<A, R>,
}

impl<A, R> InvocationExpectation<A, R> {
    /// Build an expectation around any matcher, with an empty queue
    pub fn with_matcher<M>(matcher: M) -> Self
    where
        M: InvocationMatcher<A> + 'static,
    {
        Self {
            matcher: Box::new(matcher),
            behaviors: BehaviorQueue::new(),
        }
    }

    /// Exact expectation for `args`; behaviors are appended afterwards
    pub fn exact(args: A) -> Self
    where
        A: PartialEq + fmt::Debug + 'static,
    {
        Self::with_matcher(ExactMatcher::described(args))
    }

    /// Exact expectation for argument types without `Debug`
    pub fn exact_opaque(args: A) -> Self
    where
        A: PartialEq + 'static,
    {
        Self::with_matcher(ExactMatcher::new(args))
    }

    /// Catch-all expectation seeded with one behavior
    pub fn default_with(behavior: Behavior<A, R>) -> Self {
        let mut expectation = Self::with_matcher(DefaultMatcher);
        expectation.append(behavior);
        expectation
    }

    pub fn matching<F>(predicate: F) -> Self
    where
        F: Fn(&A) -> bool + 'static,
    {
        Self::with_matcher(PredicateMatcher::new(predicate))
    }

    /// Queue another behavior; returns `self` so answers can be chained
    pub fn append(&mut self, behavior: Behavior<A, R>) -> &mut Self {
        self.behaviors.append(behavior);
        self
    }

    pub fn matches_actual(&self, args: &A) -> bool {
        self.matcher.matches_actual(args)
    }

    pub fn matches_expected(&self, args: &A) -> bool {
        self.matcher.matches_expected(args)
    }

    pub fn is_default(&self) -> bool {
        self.matcher.is_default()
    }

    pub fn describe(&self) -> String {
        self.matcher.describe()
    }

    pub fn behaviors(&self) -> &BehaviorQueue<A, R> {
        &self.behaviors
    }

    /// Whether a call dispatched here can be answered
    pub fn has_behavior(&self) -> bool {
        !self.behaviors.is_empty()
    }

    pub(crate) fn consume_next(&mut self, args: &A) -> Option<R> {
        self.behaviors.consume_next(args)
    }

    /// Drop every queued behavior, leaving the matcher in place
    pub fn clear(&mut self) {
        self.behaviors.clear();
    }
}

impl<A, R> fmt::Debug for InvocationExpectation<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationExpectation")
            .field("matcher", &self.matcher.describe())
            .field("behaviors", &self.behaviors)
            .finish()
    }
}
