use serde::{Deserialize, Serialize};

use crate::errors::{Result, TripError};

/// One entry on the shopping checklist. Identified only by its position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    /// Photo as a `data:` URI, already compressed by whoever attached it.
    #[serde(default)]
    pub image: Option<String>,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, data_uri: impl Into<String>) -> Self {
        self.image = Some(data_uri.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TripError::Validation("shopping item needs a name".into()));
        }
        if let Some(image) = &self.image {
            if !image.starts_with("data:") {
                return Err(TripError::Validation(
                    "shopping image must be a data URI".into(),
                ));
            }
        }
        Ok(())
    }
}
