//! Typed garden-record access over a [`KeyValueStore`].

use std::sync::Arc;

use verdance_core::garden::GardenRecord;

use crate::{KeyValueStore, StoreError};

/// Key namespace for garden records.
const GARDEN_KEY_PREFIX: &str = "garden";

/// Garden persistence over any key-value backend.
///
/// IDs are expected to be validated by the caller; the store only builds
/// keys from them.
#[derive(Clone)]
pub struct GardenStore {
    backend: Arc<dyn KeyValueStore>,
}

impl GardenStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    fn key(id: &str) -> String {
        format!("{GARDEN_KEY_PREFIX}:{id}")
    }

    /// Load a garden, `None` if it was never saved or has been deleted.
    pub async fn load(&self, id: &str) -> Result<Option<GardenRecord>, StoreError> {
        match self.backend.get(&Self::key(id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a garden.
    pub async fn save(&self, id: &str, record: &GardenRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        self.backend.set(&Self::key(id), &value).await
    }

    /// Remove a garden. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.backend.delete(&Self::key(id)).await
    }
}
