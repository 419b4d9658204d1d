use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValueStorage;
use crate::error::Result;

/// JSON (de)serialization over a [`KeyValueStorage`].
///
/// Collections are decoded and re-encoded whole on every access.
#[derive(Debug)]
pub struct JsonStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> JsonStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Decode the value under `key`, or `T::default()` when nothing is stored.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.storage.get_item(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(T::default()),
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.set_item(key, &raw)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key)
    }
}
