//! Cross-module tests for the run contract.
//!
//! | Module | Covers |
//! |--------|--------|
//! | `lifecycle` | start/stop ordering, error propagation, shutdown wake-up |
//! | `mocks` | counting [`crate::Lifecycle`] used by the above |
