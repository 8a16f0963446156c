//! Testing utilities and mock implementations
//!
//! Mock agent connections for exercising dispatch, aggregation, and the task
//! manager without network access to real remote agents.

pub mod mocks;

pub use mocks::*;
