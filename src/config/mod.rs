//! Configuration models for resources, the store, and engine limits.

pub mod engine;

pub use engine::{EngineConfig, ResourceConfig, StoreConfig, CONFIG_PATH_ENV};
