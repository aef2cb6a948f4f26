use crate::mock::MockRegistry;
use callstub::ArgumentSnapshot;
use std::fmt::{self, Write};

/// Verification helpers over the recorded history of a [`MockRegistry`].
///
/// Failed assertions panic with the calls that were actually recorded, like
/// the standard `assert_*` macros do.
pub struct CallAssertions<'a> {
    registry: &'a MockRegistry,
}

impl<'a> CallAssertions<'a> {
    pub fn new(registry: &'a MockRegistry) -> Self {
        Self { registry }
    }

    /// Assert `name` was called at least once with `args`
    pub fn assert_called_with<A>(&self, name: &str, args: &A)
    where
        A: PartialEq + fmt::Debug + 'static,
    {
        let calls = self.calls::<A>(name);
        if !calls.iter().any(|snapshot| snapshot.matches(args)) {
            panic!(
                "expected `{}` to be called with {:?}\n{}",
                name,
                args,
                self.listing(name, &calls)
            );
        }
    }

    /// Assert `name` was called exactly `times` times with `args`
    pub fn assert_called_times<A>(&self, name: &str, args: &A, times: usize)
    where
        A: PartialEq + fmt::Debug + 'static,
    {
        let calls = self.calls::<A>(name);
        let matched = calls.iter().filter(|snapshot| snapshot.matches(args)).count();
        if matched != times {
            panic!(
                "expected `{}` to be called {} time(s) with {:?}, but it was called {} time(s)\n{}",
                name,
                times,
                args,
                matched,
                self.listing(name, &calls)
            );
        }
    }

    /// Assert at least one call of `name` satisfied `predicate`
    pub fn assert_called_matching<A, F>(&self, name: &str, predicate: F)
    where
        A: fmt::Debug + 'static,
        F: Fn(&A) -> bool,
    {
        let calls = self.calls::<A>(name);
        if !calls.iter().any(|snapshot| snapshot.satisfies(&predicate)) {
            panic!(
                "expected a call of `{}` matching the predicate\n{}",
                name,
                self.listing(name, &calls)
            );
        }
    }

    /// Assert `name` was called exactly `count` times, whatever the arguments
    pub fn assert_call_count(&self, name: &str, count: usize) {
        let actual = self.registry.call_count(name);
        assert_eq!(
            actual, count,
            "expected `{}` to be called {} time(s), but it was called {} time(s)",
            name, count, actual
        );
    }

    pub fn assert_never_called(&self, name: &str) {
        let actual = self.registry.call_count(name);
        assert_eq!(
            actual, 0,
            "expected `{}` never to be called, but it was called {} time(s)",
            name, actual
        );
    }

    fn calls<A: 'static>(&self, name: &str) -> Vec<&'a ArgumentSnapshot<A>> {
        match self.registry.calls_of::<A>(name) {
            Ok(calls) => calls,
            Err(e) => panic!("cannot verify `{}`: {}", name, e),
        }
    }

    fn listing<A: fmt::Debug>(&self, name: &str, calls: &[&ArgumentSnapshot<A>]) -> String {
        if calls.is_empty() {
            return format!("`{}` was never called", name);
        }
        let limit = self.registry.config().verification.max_listed_calls;
        let mut out = format!("recorded calls of `{}`:", name);
        for snapshot in calls.iter().take(limit) {
            let _ = write!(out, "\n  #{} {:?}", snapshot.index(), snapshot.arguments());
        }
        if calls.len() > limit {
            let _ = write!(out, "\n  ... and {} more", calls.len() - limit);
        }
        out
    }
}
