use serde::Serialize;

/// Immutable record of the arguments of one actual call.
///
/// `index` is the zero-based position of the call in its operation's
/// history. Matching against a candidate tuple is only available when the
/// argument tuple implements `PartialEq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentSnapshot<A> {
    index: usize,
    arguments: A,
}

impl<A> ArgumentSnapshot<A> {
    /// Capture the arguments of the call at position `index`
    pub fn new(index: usize, arguments: A) -> Self {
        Self { index, arguments }
    }

    /// Position of this call in the operation's history
    pub fn index(&self) -> usize {
        self.index
    }

    /// The recorded argument tuple
    pub fn arguments(&self) -> &A {
        &self.arguments
    }

    pub fn into_arguments(self) -> A {
        self.arguments
    }

    /// Check the recorded arguments against an arbitrary predicate
    pub fn satisfies<F>(&self, filter: F) -> bool
    where
        F: Fn(&A) -> bool,
    {
        filter(&self.arguments)
    }
}

impl<A: PartialEq> ArgumentSnapshot<A> {
    /// Element-wise equality against a candidate argument tuple
    pub fn matches(&self, expected: &A) -> bool {
        self.arguments == *expected
    }
}
