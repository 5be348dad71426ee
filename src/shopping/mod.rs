//! Shopping checklist.

use serde::{Deserialize, Serialize};

use crate::domain::ShoppingItem;
use crate::errors::{Result, TripError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList {
    items: Vec<ShoppingItem>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ShoppingItem> {
        self.items.get(index)
    }

    pub fn add(&mut self, item: ShoppingItem) -> Result<()> {
        item.validate()?;
        self.items.push(item);
        Ok(())
    }

    /// Fails with [`TripError::ShoppingIndexOutOfRange`] for positions past the end.
    pub fn ensure_index(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(TripError::ShoppingIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<ShoppingItem> {
        self.ensure_index(index)?;
        Ok(self.items.remove(index))
    }

    pub fn replace_all(&mut self, items: Vec<ShoppingItem>) {
        self.items.clear();
        self.items.extend(items);
    }
}
