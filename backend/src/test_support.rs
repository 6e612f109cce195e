//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via
//! the `test-support` feature). Nothing here talks to PostgreSQL.

mod clock;
mod memory;

pub use clock::SteppingClock;
pub use memory::InMemorySocialStore;
