use std::{fs, path::PathBuf};

use serde_json::Value;

use crate::core::utils::{ensure_dir, write_atomic};
use crate::errors::Result;

use super::{PersistenceGateway, StoreKey};

const STORE_EXTENSION: &str = "json";

/// One pretty-printed JSON file per [`StoreKey`] inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn path_for(&self, key: StoreKey) -> PathBuf {
        self.root
            .join(format!("{}.{}", key.as_str(), STORE_EXTENSION))
    }
}

impl PersistenceGateway for JsonFileStore {
    fn save(&self, key: StoreKey, value: &Value) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&self.path_for(key), &json)
    }

    fn load(&self, key: StoreKey) -> Result<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonFileStore, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("store")).expect("store");
        (store, dir)
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (store, _dir) = store_with_temp_dir();
        let value = json!([{"name": "Matcha KitKat", "image": null}]);
        store.save(StoreKey::Shopping, &value).unwrap();
        assert_eq!(store.load(StoreKey::Shopping).unwrap(), Some(value));
        assert!(store.path_for(StoreKey::Shopping).ends_with("trip_shopping_v1.json"));
    }

    #[test]
    fn each_key_gets_its_own_file() {
        let (store, _dir) = store_with_temp_dir();
        for (idx, key) in StoreKey::ALL.into_iter().enumerate() {
            store.save(key, &json!([idx])).unwrap();
        }
        for (idx, key) in StoreKey::ALL.into_iter().enumerate() {
            assert_eq!(store.load(key).unwrap(), Some(json!([idx])));
        }
    }

    #[test]
    fn absent_key_loads_as_none() {
        let (store, _dir) = store_with_temp_dir();
        assert_eq!(store.load(StoreKey::Expenses).unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let (store, _dir) = store_with_temp_dir();
        fs::write(store.path_for(StoreKey::Itinerary), "{not json").unwrap();
        assert!(store.load(StoreKey::Itinerary).is_err());
    }
}
