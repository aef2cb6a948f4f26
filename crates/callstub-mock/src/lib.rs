//! Mock objects on top of the `callstub` engine: a registry of operation
//! mocks per mock object, fluent stubbing and call assertions.

pub mod assertions;
pub mod builder;
pub mod mock;

pub use assertions::CallAssertions;
pub use builder::{MockBuilder, Stubbing};
pub use callstub::{Behavior, Config, OperationMock, Result, StubError};
pub use mock::{MockHandle, MockRegistry};
