pub mod behavior;
pub mod expectation;
pub mod operation;
pub mod snapshot;
