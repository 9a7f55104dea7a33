// Shared fixtures for certrace test suites. Mirrors the scenario used
// by the original integration tests: a synthetic "FakeOperation" test
// whose records carry one lifecycle event each.

pub mod fake;
pub mod fixtures;

pub use fake::{FAKE_OPERATION, FakeOperationHandler, FakeOperationSummarizer, fake_spec};
pub use fixtures::*;
