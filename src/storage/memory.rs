use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::{Store, StoreError};

/// Process-local store, used for tests and `--ephemeral` sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        values.remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        Ok(values.remove(key))
    }
}
