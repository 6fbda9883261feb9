//! Admission request store backends.

pub mod memory;

pub use memory::{InMemoryStore, DEFAULT_LOCK_TIMEOUT};
