use crate::builder::Stubbing;
use callstub::{logging, signature_of, ArgumentSnapshot, Config, OperationMock};
use callstub::{DefaultMatcher, InvocationExpectation};
use callstub::{Result, StubError};
use std::any::{Any, TypeId};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one mock object
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MockHandle {
    id: u64,
    name: String,
}

impl MockHandle {
    /// Allocate a handle with a process-unique id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_MOCK_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// Type-erased view of an `OperationMock`, so one registry can own
/// operations of different signatures.
trait ErasedOperation {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn signature(&self) -> &'static str;
    fn arguments_type(&self) -> TypeId;
    fn call_count(&self) -> usize;
    fn clear_history(&mut self);
    fn snapshots(&self) -> Vec<&dyn Any>;
}

impl<A: 'static, R: 'static> ErasedOperation for OperationMock<A, R> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn signature(&self) -> &'static str {
        OperationMock::signature(self)
    }

    fn arguments_type(&self) -> TypeId {
        TypeId::of::<A>()
    }

    fn call_count(&self) -> usize {
        OperationMock::call_count(self)
    }

    fn clear_history(&mut self) {
        OperationMock::clear_history(self)
    }

    fn snapshots(&self) -> Vec<&dyn Any> {
        self.calls()
            .iter()
            .map(|snapshot| snapshot as &dyn Any)
            .collect()
    }
}

fn boxed<A: 'static, R: 'static>(mock: OperationMock<A, R>) -> Box<dyn ErasedOperation> {
    Box::new(mock)
}

fn downcast_mut<'a, A: 'static, R: 'static>(
    name: &str,
    slot: &'a mut Box<dyn ErasedOperation>,
) -> Result<&'a mut OperationMock<A, R>> {
    let expected = slot.signature();
    slot.as_any_mut()
        .downcast_mut::<OperationMock<A, R>>()
        .ok_or_else(|| StubError::SignatureMismatch {
            operation: name.to_string(),
            expected,
            found: signature_of::<A, R>(),
        })
}

/// All operation mocks of one mock object, keyed by operation name.
///
/// Each name maps to exactly one signature; asking for a name under another
/// signature fails with [`StubError::SignatureMismatch`].
pub struct MockRegistry {
    handle: MockHandle,
    config: Config,
    operations: BTreeMap<String, Box<dyn ErasedOperation>>,
}

impl MockRegistry {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, Config::default())
    }

    pub fn with_config(name: impl Into<String>, config: Config) -> Self {
        Self {
            handle: MockHandle::new(name),
            config,
            operations: BTreeMap::new(),
        }
    }

    pub fn handle(&self) -> &MockHandle {
        &self.handle
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Install a prepared operation mock, replacing one of the same
    /// signature registered under the same name
    pub fn register<A: 'static, R: 'static>(
        &mut self,
        mock: OperationMock<A, R>,
    ) -> Result<&mut OperationMock<A, R>> {
        let name = mock.name().to_string();
        match self.operations.entry(name.clone()) {
            Entry::Occupied(mut entry) => {
                if !entry.get().as_any().is::<OperationMock<A, R>>() {
                    return Err(StubError::SignatureMismatch {
                        operation: name,
                        expected: entry.get().signature(),
                        found: signature_of::<A, R>(),
                    });
                }
                entry.insert(boxed(mock));
                downcast_mut(&name, entry.into_mut())
            }
            Entry::Vacant(entry) => downcast_mut(&name, entry.insert(boxed(mock))),
        }
    }

    /// Get the operation `name`, creating a strict one if it is unknown
    pub fn operation<A: 'static, R: 'static>(
        &mut self,
        name: &str,
    ) -> Result<&mut OperationMock<A, R>> {
        let slot = self
            .operations
            .entry(name.to_string())
            .or_insert_with(|| boxed(OperationMock::<A, R>::strict(name)));
        downcast_mut(name, slot)
    }

    /// Get the operation `name`, creating one that answers `R::default()`
    /// if it is unknown. Under `mock.strict` no default is seeded.
    pub fn operation_with_default<A: 'static, R: Default + 'static>(
        &mut self,
        name: &str,
    ) -> Result<&mut OperationMock<A, R>> {
        let strict = self.config.mock.strict;
        let slot = self.operations.entry(name.to_string()).or_insert_with(|| {
            if strict {
                boxed(OperationMock::<A, R>::strict(name))
            } else {
                boxed(OperationMock::<A, R>::with_default_value(name))
            }
        });
        downcast_mut(name, slot)
    }

    /// Read-only access to a registered operation
    pub fn get<A: 'static, R: 'static>(&self, name: &str) -> Result<Option<&OperationMock<A, R>>> {
        let Some(slot) = self.operations.get(name) else {
            return Ok(None);
        };
        slot.as_any()
            .downcast_ref::<OperationMock<A, R>>()
            .map(Some)
            .ok_or_else(|| StubError::SignatureMismatch {
                operation: name.to_string(),
                expected: slot.signature(),
                found: signature_of::<A, R>(),
            })
    }

    /// Entry point for the interception layer: dispatch a call to `name`.
    ///
    /// Calls to unknown operations are recorded on a fresh strict operation
    /// and fail with [`StubError::NoMatchingBehavior`].
    pub fn call<A, R>(&mut self, name: &str, args: A) -> Result<R>
    where
        A: fmt::Debug + 'static,
        R: 'static,
    {
        self.operation::<A, R>(name)?
            .handle_call(args)
            .map_err(|e| {
                if let StubError::NoMatchingBehavior {
                    operation,
                    arguments,
                    ..
                } = &e
                {
                    logging::log_call_unmatched(operation, arguments);
                }
                e
            })
    }

    /// Recorded calls of `name` in call order; empty if it was never used
    pub fn calls_of<A: 'static>(&self, name: &str) -> Result<Vec<&ArgumentSnapshot<A>>> {
        let Some(slot) = self.operations.get(name) else {
            return Ok(Vec::new());
        };
        if slot.arguments_type() != TypeId::of::<A>() {
            return Err(StubError::SignatureMismatch {
                operation: name.to_string(),
                expected: slot.signature(),
                found: std::any::type_name::<A>(),
            });
        }
        Ok(slot
            .snapshots()
            .into_iter()
            .filter_map(|snapshot| snapshot.downcast_ref::<ArgumentSnapshot<A>>())
            .collect())
    }

    /// Number of calls recorded for `name`, whatever its signature
    pub fn call_count(&self, name: &str) -> usize {
        self.operations
            .get(name)
            .map_or(0, |slot| slot.call_count())
    }

    pub fn total_calls(&self) -> usize {
        self.operations.values().map(|slot| slot.call_count()).sum()
    }

    /// Names of every registered operation, sorted
    pub fn mocked_operations(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }

    /// Start stubbing exact arguments of `name`
    pub fn when<A, R>(&mut self, name: &str, args: A) -> Result<Stubbing<'_, A, R>>
    where
        A: PartialEq + 'static,
        R: 'static,
    {
        Ok(Stubbing::new(self.operation::<A, R>(name)?.stub(args)))
    }

    /// Start stubbing a new catch-all for `name`, shadowing older defaults
    pub fn when_any<A: 'static, R: 'static>(&mut self, name: &str) -> Result<Stubbing<'_, A, R>> {
        let operation = self.operation::<A, R>(name)?;
        Ok(Stubbing::new(
            operation.register(InvocationExpectation::with_matcher(DefaultMatcher)),
        ))
    }

    /// Start stubbing every call of `name` accepted by `predicate`
    pub fn when_matching<A, R, F>(&mut self, name: &str, predicate: F) -> Result<Stubbing<'_, A, R>>
    where
        A: 'static,
        R: 'static,
        F: Fn(&A) -> bool + 'static,
    {
        Ok(Stubbing::new(
            self.operation::<A, R>(name)?.stub_matching(predicate),
        ))
    }

    /// Forget every recorded call, keeping all stubs
    pub fn reset_history(&mut self) {
        for slot in self.operations.values_mut() {
            slot.clear_history();
        }
    }

    /// Drop every operation with its stubs and history
    pub fn reset(&mut self) {
        self.operations.clear();
    }
}

impl fmt::Debug for MockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRegistry")
            .field("handle", &self.handle)
            .field("operations", &self.mocked_operations())
            .finish()
    }
}
