//! Record storage for ctfboard.
//!
//! State is kept as whole collections serialized to JSON under well-known
//! keys in a [`RecordStore`]. [`Records`] is the adapter the scoreboard uses
//! to read both collections at startup and rewrite them after each mutation.

mod memory;
pub mod migrations;
mod records;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use records::Records;
pub use sqlite::{SqliteStore, StorageStats};

use crate::error::Result;

/// A synchronous string key-value store.
///
/// Writes replace the whole value for a key; there are no transactions
/// spanning several keys.
pub trait RecordStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}
