//! Infrastructure adapters for request stores and resource directories.

pub mod directory;
pub mod store;

pub use directory::StaticResourceDirectory;
pub use store::InMemoryStore;
