//! Test utilities for RoomKey
//!
//! Fixtures, a fault-injecting store wrapper and deterministic code
//! sources, shared by unit tests and the integration tests under `tests/`.
//! Fixtures panic on malformed input instead of returning errors.

pub mod deterministic_rng;
pub mod fixtures;
pub mod flaky_store;

pub use deterministic_rng::*;
pub use fixtures::*;
pub use flaky_store::FlakyStore;
