use super::behavior::Behavior;
use super::expectation::InvocationExpectation;
use super::snapshot::ArgumentSnapshot;
use crate::logging;
use crate::{Result, StubError};
use serde::Serialize;
use std::fmt;

/// Printable signature of an operation taking `A` and returning `R`
pub fn signature_of<A, R>() -> &'static str {
    std::any::type_name::<fn(A) -> R>()
}

/// Stubbing and call dispatch for one intercepted operation.
///
/// Expectations are kept in registration order and scanned newest first, so
/// re-stubbing mid-test shadows older configuration. Catch-all defaults are
/// only consulted after every exact and predicate expectation. Every call
/// handled is appended to the history before it is dispatched.
pub struct OperationMock<A, R> {
    name: String,
    expectations: Vec<InvocationExpectation<A, R>>,
    calls: Vec<ArgumentSnapshot<A>>,
}

impl<A, R> OperationMock<A, R> {
    /// Create a mock seeded with one catch-all expectation answering with
    /// `default_behavior`
    pub fn new(name: impl Into<String>, default_behavior: Behavior<A, R>) -> Self {
        let mut mock = Self::unseeded(name.into());
        mock.expectations
            .push(InvocationExpectation::default_with(default_behavior));
        logging::log_operation_created(&mock.name, signature_of::<A, R>(), true);
        mock
    }

    /// Create a mock without any default.
    ///
    /// Calls that no stub claims fail with [`StubError::NoMatchingBehavior`].
    pub fn strict(name: impl Into<String>) -> Self {
        let mock = Self::unseeded(name.into());
        logging::log_operation_created(&mock.name, signature_of::<A, R>(), false);
        mock
    }

    fn unseeded(name: String) -> Self {
        Self {
            name,
            expectations: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &'static str {
        signature_of::<A, R>()
    }

    /// Register an expectation as the most recent one
    pub fn register(
        &mut self,
        expectation: InvocationExpectation<A, R>,
    ) -> &mut InvocationExpectation<A, R> {
        self.expectations.push(expectation);
        let position = self.expectations.len() - 1;
        &mut self.expectations[position]
    }

    /// Register a fresh catch-all expectation, shadowing any older default.
    ///
    /// Exact and predicate expectations still take precedence over it.
    pub fn stub_default(&mut self, behavior: Behavior<A, R>) -> &mut InvocationExpectation<A, R> {
        logging::log_default_registered(&self.name, self.expectations.len());
        self.register(InvocationExpectation::default_with(behavior))
    }

    /// Register an expectation claiming every call accepted by `predicate`.
    ///
    /// Predicates are never merged, each call registers a new expectation.
    pub fn stub_matching<F>(&mut self, predicate: F) -> &mut InvocationExpectation<A, R>
    where
        F: Fn(&A) -> bool + 'static,
    {
        logging::log_predicate_registered(&self.name, self.expectations.len());
        self.register(InvocationExpectation::matching(predicate))
    }

    /// Dispatch an actual call.
    ///
    /// The arguments are recorded first, then the newest non-default
    /// expectation that claims them and still has a behavior answers. Only
    /// when none does is the newest default with a behavior consulted.
    /// Whatever the behavior returns is passed back untouched, and a
    /// panicking behavior unwinds through here.
    pub fn handle_call(&mut self, args: A) -> Result<R>
    where
        A: fmt::Debug,
    {
        let index = self.calls.len();
        self.calls.push(ArgumentSnapshot::new(index, args));
        let args = self.calls[index].arguments();

        // Exact and predicate expectations first, catch-all defaults last.
        for defaults in [false, true] {
            for (position, expectation) in self.expectations.iter_mut().enumerate().rev() {
                if expectation.is_default() != defaults || !expectation.matches_actual(args) {
                    continue;
                }
                if let Some(result) = expectation.consume_next(args) {
                    logging::log_call_dispatched(&self.name, index, &*expectation, position);
                    return Ok(result);
                }
            }
        }

        Err(StubError::NoMatchingBehavior {
            operation: self.name.clone(),
            signature: signature_of::<A, R>(),
            arguments: format!("{:?}", args),
        })
    }

    /// Recorded calls accepted by `filter`, in call order
    pub fn history<F>(&self, filter: F) -> Vec<&ArgumentSnapshot<A>>
    where
        F: Fn(&A) -> bool,
    {
        let matched: Vec<_> = self
            .calls
            .iter()
            .filter(|snapshot| snapshot.satisfies(&filter))
            .collect();
        logging::log_history_query(&self.name, matched.len(), self.calls.len());
        matched
    }

    /// Every recorded call, in call order
    pub fn calls(&self) -> &[ArgumentSnapshot<A>] {
        &self.calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    pub fn last_call(&self) -> Option<&ArgumentSnapshot<A>> {
        self.calls.last()
    }

    /// Expectations in registration order (oldest first)
    pub fn expectations(&self) -> &[InvocationExpectation<A, R>] {
        &self.expectations
    }

    /// The most recently registered expectation
    pub fn last_expectation(&mut self) -> Option<&mut InvocationExpectation<A, R>> {
        self.expectations.last_mut()
    }

    /// Remove every expectation, including seeded defaults
    pub fn clear_expectations(&mut self) {
        logging::log_expectations_cleared(&self.name, self.expectations.len());
        self.expectations.clear();
    }

    pub fn clear_history(&mut self) {
        logging::log_history_cleared(&self.name, self.calls.len());
        self.calls.clear();
    }

    /// Serializable summary of the recorded calls
    pub fn history_report(&self) -> HistoryReport<'_, A>
    where
        A: Serialize,
    {
        HistoryReport {
            operation: &self.name,
            signature: signature_of::<A, R>(),
            expectations: self.expectations.len(),
            calls: &self.calls,
        }
    }
}

impl<A: 'static, R: Default + 'static> OperationMock<A, R> {
    /// Create a mock whose default answers with `R::default()`
    pub fn with_default_value(name: impl Into<String>) -> Self {
        Self::new(name, Behavior::default_value())
    }
}

impl<A, R> OperationMock<A, R>
where
    A: PartialEq + 'static,
{
    /// Find or create the exact expectation for `args`.
    ///
    /// An exact expectation already registered for equal arguments is
    /// returned so new behaviors extend its queue; otherwise a new one is
    /// registered as the most recent. Catch-all and predicate expectations
    /// are never returned here.
    pub fn stub(&mut self, args: A) -> &mut InvocationExpectation<A, R> {
        let found = self
            .expectations
            .iter()
            .rposition(|expectation| expectation.matches_expected(&args));

        let position = match found {
            Some(position) => {
                logging::log_stub_extended(&self.name, &self.expectations[position], position);
                position
            }
            None => {
                self.expectations
                    .push(InvocationExpectation::exact_opaque(args));
                let position = self.expectations.len() - 1;
                logging::log_stub_registered(&self.name, &self.expectations[position], position);
                position
            }
        };
        &mut self.expectations[position]
    }
}

impl<A: PartialEq, R> OperationMock<A, R> {
    /// Recorded calls whose arguments equal `args`, in call order
    pub fn history_of(&self, args: &A) -> Vec<&ArgumentSnapshot<A>> {
        self.history(|recorded| recorded == args)
    }
}

impl<A, R> fmt::Debug for OperationMock<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationMock")
            .field("name", &self.name)
            .field("signature", &signature_of::<A, R>())
            .field("expectations", &self.expectations)
            .field("calls", &self.calls.len())
            .finish()
    }
}

/// Recorded history of one operation, ready to be serialized
#[derive(Debug, Serialize)]
pub struct HistoryReport<'a, A> {
    pub operation: &'a str,
    pub signature: &'static str,
    pub expectations: usize,
    pub calls: &'a [ArgumentSnapshot<A>],
}

impl<A: Serialize> HistoryReport<'_, A> {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
