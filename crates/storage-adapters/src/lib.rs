//! # storage-adapters
//!
//! Implementations of the `domains` ports. The in-memory store is always
//! compiled; the SQLite store sits behind the `db-sqlite` feature.

pub mod memory;

#[cfg(feature = "db-sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;

#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteStore;
