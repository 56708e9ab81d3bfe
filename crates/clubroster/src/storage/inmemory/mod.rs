//! In-memory storage backend for testing.
//!
//! This module provides an in-memory implementation of the repository traits
//! that stores all data in HashMaps wrapped in `Arc<RwLock<_>>`. It enforces
//! the same key and reference rules as the SQLite backend so tests written
//! against one hold for the other.
//!
//! # Example
//!
//! ```rust,ignore
//! use clubroster::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! // Use repo for testing...
//! ```

mod repository;

pub use repository::InMemoryRepository;
