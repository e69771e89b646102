//! Key-value persistence
//!
//! The core only needs string get/set. Browsers back it with LocalStorage;
//! native runs and tests use an in-memory map. Unparseable values are
//! treated as absent.

use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod profile;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use profile::{Profile, RecordOutcome};

/// Storage keys
pub mod keys {
    pub const LEADERBOARD: &str = "leaderboard";
    pub const PLAYER_NAME: &str = "playerName";
    pub const PERSONAL_BEST: &str = "personalBest";
    pub const SETTINGS: &str = "settings";
}

/// Simple persistent string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a value
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Read and deserialize a JSON value, falling back to `T::default()` when absent or malformed
pub fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match store.get(key) {
        Some(json) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding malformed '{key}': {e}");
                T::default()
            }
        },
        None => T::default(),
    }
}

/// Serialize and write a JSON value
pub fn save_json<T: serde::Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => log::warn!("Failed to serialize '{key}': {e}"),
    }
}
