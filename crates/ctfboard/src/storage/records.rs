//! Persistence adapter for the two scoreboard collections.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::RecordStore;
use crate::config::{StorageConfig, DEFAULT_PARTICIPANTS_KEY, DEFAULT_RESULTS_KEY};
use crate::error::Result;
use crate::model::{Participant, TeamResult};

/// Reads and writes the participant and result lists as JSON records.
///
/// A missing record loads as an empty list. So does a record that is not
/// valid JSON for the expected shape; that case is logged and the record is
/// replaced on the next write.
#[derive(Debug)]
pub struct Records<S> {
    store: S,
    participants_key: String,
    results_key: String,
}

impl<S: RecordStore> Records<S> {
    /// Use the default record keys.
    pub fn new(store: S) -> Self {
        Self::with_keys(store, DEFAULT_PARTICIPANTS_KEY, DEFAULT_RESULTS_KEY)
    }

    /// Use the record keys from the storage configuration.
    pub fn from_config(store: S, config: &StorageConfig) -> Self {
        Self::with_keys(store, &config.participants_key, &config.results_key)
    }

    /// Use custom record keys.
    pub fn with_keys(store: S, participants_key: &str, results_key: &str) -> Self {
        Self {
            store,
            participants_key: participants_key.to_string(),
            results_key: results_key.to_string(),
        }
    }

    /// Load the participant list.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying store cannot be read.
    pub fn load_participants(&self) -> Result<Vec<Participant>> {
        self.load_list(&self.participants_key)
    }

    /// Load the result list.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying store cannot be read.
    pub fn load_results(&self) -> Result<Vec<TeamResult>> {
        self.load_list(&self.results_key)
    }

    /// Rewrite the participant list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save_participants(&mut self, participants: &[Participant]) -> Result<()> {
        let key = self.participants_key.clone();
        self.save_list(&key, participants)
    }

    /// Rewrite the result list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save_results(&mut self, results: &[TeamResult]) -> Result<()> {
        let key = self.results_key.clone();
        self.save_list(&key, results)
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(text) = self.store.read(key)? else {
            debug!(key, "record absent, starting empty");
            return Ok(Vec::new());
        };

        // A stored `null` is treated like an absent record
        let entries = match serde_json::from_str::<Option<Vec<serde_json::Value>>>(&text) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!(key, error = %e, "record is corrupt, starting empty");
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let list: Vec<T> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(key, index, error = %e, "skipping corrupt entry");
                    None
                }
            })
            .collect();

        debug!(key, count = list.len(), skipped = total - list.len(), "record loaded");
        Ok(list)
    }

    fn save_list<T: Serialize>(&mut self, key: &str, list: &[T]) -> Result<()> {
        let text = serde_json::to_string(list)?;
        self.store.write(key, &text)
    }
}
