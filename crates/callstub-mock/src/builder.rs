use crate::mock::MockRegistry;
use callstub::{Behavior, Config, InvocationExpectation, OperationMock, Result, StubError};
use std::path::Path;

/// Fluent answers for one expectation.
///
/// ```ignore
/// registry.when("lookup", (5,))?.then_return(10).then_return(20);
/// ```
pub struct Stubbing<'a, A, R> {
    expectation: &'a mut InvocationExpectation<A, R>,
}

impl<'a, A: 'static, R: 'static> Stubbing<'a, A, R> {
    pub fn new(expectation: &'a mut InvocationExpectation<A, R>) -> Self {
        Self { expectation }
    }

    pub fn then_return(self, value: R) -> Self
    where
        R: Clone,
    {
        self.then(Behavior::returning(value))
    }

    /// Answer with each value in turn, repeating the last one
    pub fn then_returns<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Clone,
    {
        for value in values {
            self = self.then_return(value);
        }
        self
    }

    pub fn then_do<F>(self, f: F) -> Self
    where
        F: FnMut(&A) -> R + 'static,
    {
        self.then(Behavior::new(f))
    }

    pub fn then_default(self) -> Self
    where
        R: Default,
    {
        self.then(Behavior::default_value())
    }

    pub fn then_panic(self, message: impl Into<String>) -> Self {
        self.then(Behavior::panicking(message))
    }

    pub fn then(self, behavior: Behavior<A, R>) -> Self {
        self.expectation.append(behavior);
        self
    }

    /// Give up the fluent wrapper and keep the expectation itself
    pub fn expectation(self) -> &'a mut InvocationExpectation<A, R> {
        self.expectation
    }
}

/// Builder for a [`MockRegistry`] prepared with operations and stubs.
///
/// Registration errors are kept and reported by [`MockBuilder::build`], so
/// calls can be chained without `?` on every step.
pub struct MockBuilder {
    registry: MockRegistry,
    error: Option<StubError>,
}

impl MockBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            registry: MockRegistry::new(name),
            error: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.registry.set_config(config);
        self
    }

    /// Read the configuration from a TOML file
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Self {
        match Config::load_from(path) {
            Ok(config) => self.registry.set_config(config),
            Err(e) => self.record(e),
        }
        self
    }

    /// Register `name` with a default behavior answering unstubbed calls
    pub fn with_operation<A: 'static, R: 'static>(
        mut self,
        name: &str,
        default_behavior: Behavior<A, R>,
    ) -> Self {
        let result = self
            .registry
            .register(OperationMock::new(name, default_behavior))
            .map(|_| ());
        self.keep(result)
    }

    /// Register `name` answering `R::default()` (nothing under `mock.strict`)
    pub fn with_default_value<A: 'static, R: Default + 'static>(mut self, name: &str) -> Self {
        let result = self
            .registry
            .operation_with_default::<A, R>(name)
            .map(|_| ());
        self.keep(result)
    }

    /// Register `name` without any default
    pub fn with_strict<A: 'static, R: 'static>(mut self, name: &str) -> Self {
        let result = self
            .registry
            .register(OperationMock::<A, R>::strict(name))
            .map(|_| ());
        self.keep(result)
    }

    pub fn with_return<A, R>(self, name: &str, args: A, value: R) -> Self
    where
        A: PartialEq + 'static,
        R: Clone + 'static,
    {
        self.with_returns(name, args, [value])
    }

    /// Stub `args` of `name` with a sequence of answers
    pub fn with_returns<A, R, I>(mut self, name: &str, args: A, values: I) -> Self
    where
        A: PartialEq + 'static,
        R: Clone + 'static,
        I: IntoIterator<Item = R>,
    {
        let result = self
            .registry
            .when::<A, R>(name, args)
            .map(|stubbing| {
                stubbing.then_returns(values);
            });
        self.keep(result)
    }

    pub fn build(self) -> Result<MockRegistry> {
        if let Some(e) = self.error {
            return Err(e);
        }
        tracing::debug!(
            mock = %self.registry.handle(),
            operations = self.registry.mocked_operations().len(),
            "Mock built"
        );
        Ok(self.registry)
    }

    fn keep(mut self, result: Result<()>) -> Self {
        if let Err(e) = result {
            self.record(e);
        }
        self
    }

    fn record(&mut self, error: StubError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}
