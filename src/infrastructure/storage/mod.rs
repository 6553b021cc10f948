//! Storage infrastructure - Key-value store implementations

mod file;
mod in_memory;

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;
