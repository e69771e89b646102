//! Browser LocalStorage backend

use super::KeyValueStore;

/// LocalStorage with a per-game key prefix
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
    prefix: &'static str,
}

impl LocalStorage {
    pub fn new(prefix: &'static str) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress will not be saved");
        }
        Self { storage, prefix }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        storage.get_item(&self.full_key(key)).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(storage) = &self.storage else { return };
        if storage.set_item(&self.full_key(key), value).is_err() {
            log::warn!("Failed to save '{key}' to LocalStorage");
        }
    }
}
