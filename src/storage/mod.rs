//! Key-value persistence for the three trip stores.

pub mod json_backend;
pub mod memory;

use std::fmt;

use serde_json::Value;

use crate::errors::Result;

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

/// Logical keys under which trip state is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    Itinerary,
    Shopping,
    Expenses,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [StoreKey::Itinerary, StoreKey::Shopping, StoreKey::Expenses];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Itinerary => "trip_itinerary_v2",
            StoreKey::Shopping => "trip_shopping_v1",
            StoreKey::Expenses => "trip_expenses_v1",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque blob store. Nothing here is transactional: each key is written on its own.
pub trait PersistenceGateway: Send + Sync {
    fn save(&self, key: StoreKey, value: &Value) -> Result<()>;

    /// `Ok(None)` when nothing was ever stored under `key`.
    fn load(&self, key: StoreKey) -> Result<Option<Value>>;
}
