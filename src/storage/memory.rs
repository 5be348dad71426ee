use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::errors::{Result, TripError};

use super::{PersistenceGateway, StoreKey};

/// In-process store keeping serialized strings, the way browser storage does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<StoreKey, String>>,
    writes: Mutex<HashMap<StoreKey, usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a raw blob under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: StoreKey, raw: impl Into<String>) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key, raw.into());
        }
    }

    pub fn raw(&self, key: StoreKey) -> Option<String> {
        self.blobs.lock().ok()?.get(&key).cloned()
    }

    /// How many times `save` ran for `key`.
    pub fn write_count(&self, key: StoreKey) -> usize {
        self.writes
            .lock()
            .map(|writes| writes.get(&key).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl PersistenceGateway for MemoryStore {
    fn save(&self, key: StoreKey, value: &Value) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.blobs
            .lock()
            .map_err(|_| TripError::Validation("memory store poisoned".into()))?
            .insert(key, json);
        if let Ok(mut writes) = self.writes.lock() {
            *writes.entry(key).or_default() += 1;
        }
        Ok(())
    }

    fn load(&self, key: StoreKey) -> Result<Option<Value>> {
        match self.raw(key) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
