//! SQLite-backed persistence for the Store side of Loom: entries and their
//! representations/assets, memories, the per-owner hash chain, and typed
//! relationships between entries.
//!
//! A single [`pool::WriteConnection`] serializes all mutations; a
//! [`pool::ReadPool`] of read-only connections serves concurrent reads
//! against the WAL (§5).

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use loom_core::errors::{LoomError, StorageError};

/// Wrap a SQLite (or pool) failure as a [`LoomError::Storage`].
pub fn to_storage_err(message: impl Into<String>) -> LoomError {
    LoomError::Storage(StorageError::Sqlite { message: message.into() })
}
