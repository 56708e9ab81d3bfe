//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `clubroster_core::storage`.
//!
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//! - `inmemory`: HashMap-backed storage, compiled for tests or with the
//!   `inmemory` feature

pub mod sqlite;

#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

pub use sqlite::SqliteRepository;

#[cfg(any(test, feature = "inmemory"))]
#[allow(unused_imports)]
pub use inmemory::InMemoryRepository;
