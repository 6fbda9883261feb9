//! Resource directory backends.

pub mod memory;

pub use memory::StaticResourceDirectory;
