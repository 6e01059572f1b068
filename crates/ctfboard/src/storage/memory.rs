//! In-memory record store.

use std::collections::BTreeMap;

use super::RecordStore;
use crate::error::Result;

/// A [`RecordStore`] backed by a map. Contents are lost on drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.read("nothing").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_write_replaces_value() {
        let mut store = MemoryStore::new();
        store.write("k", "one").unwrap();
        store.write("k", "two").unwrap();

        assert_eq!(store.read("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }
}
