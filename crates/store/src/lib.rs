//! Document store implementations for Packloom.

pub mod file;
pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::FileStore;
pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
