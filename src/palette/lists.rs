use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::storage::{Store, StoreError};

pub const HISTORY_KEY: &str = "colorHistory";
pub const FAVORITES_KEY: &str = "colors";
pub const LAST_PICKED_KEY: &str = "lastPickedColor";

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;
pub const DEFAULT_FAVORITES_CAPACITY: usize = 10;

#[derive(Debug, Error)]
pub enum ListError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no color selected")]
    NothingSelected,
}

/// Where a list lives in the store and how long it may grow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSlot {
    pub key: &'static str,
    pub capacity: usize,
}

impl ListSlot {
    pub const fn history(capacity: usize) -> Self {
        Self { key: HISTORY_KEY, capacity }
    }

    pub const fn favorites(capacity: usize) -> Self {
        Self { key: FAVORITES_KEY, capacity }
    }
}

/// Put `hex` at the front of `list`, dropping any earlier copy and
/// everything past `capacity`.
pub fn push_front_unique(list: &mut Vec<String>, hex: &str, capacity: usize) {
    list.retain(|c| c != hex);
    list.insert(0, hex.to_string());
    list.truncate(capacity);
}

/// History and favorites, read from and written back to the store on every
/// call.
///
/// Nothing is cached between calls. Two callers mutating the same list at
/// once race, and the later write wins.
pub struct ColorListManager<S> {
    store: Arc<S>,
    history: ListSlot,
    favorites: ListSlot,
}

impl<S> Clone for ColorListManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            history: self.history,
            favorites: self.favorites,
        }
    }
}

impl<S: Store> ColorListManager<S> {
    #[cfg(test)]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_capacities(store, DEFAULT_HISTORY_CAPACITY, DEFAULT_FAVORITES_CAPACITY)
    }

    pub fn with_capacities(store: Arc<S>, history: usize, favorites: usize) -> Self {
        Self {
            store,
            history: ListSlot::history(history.max(1)),
            favorites: ListSlot::favorites(favorites.max(1)),
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn list_history(&self) -> Result<Vec<String>, ListError> {
        self.read(self.history).await
    }

    pub async fn list_favorites(&self) -> Result<Vec<String>, ListError> {
        self.read(self.favorites).await
    }

    /// Move `hex` to the front of history. Empty input leaves history alone.
    pub async fn record_history(&self, hex: &str) -> Result<Vec<String>, ListError> {
        if hex.is_empty() {
            return self.list_history().await;
        }
        let list = self.insert(self.history, hex).await?;
        log::debug!("history is now {list:?}");
        Ok(list)
    }

    /// Move `hex` to the front of favorites.
    ///
    /// A missing or empty selection is reported as `NothingSelected` without
    /// touching the store.
    pub async fn save_favorite(&self, hex: Option<&str>) -> Result<Vec<String>, ListError> {
        let hex = match hex {
            Some(hex) if !hex.is_empty() => hex,
            _ => return Err(ListError::NothingSelected),
        };
        let list = self.insert(self.favorites, hex).await?;
        log::info!("saved favorite {hex}");
        Ok(list)
    }

    /// Drop every favorite equal to `hex`. Absent values are not an error.
    pub async fn remove_favorite(&self, hex: &str) -> Result<Vec<String>, ListError> {
        let mut list = self.read(self.favorites).await?;
        list.retain(|c| c != hex);
        self.write(self.favorites, &list).await?;
        log::info!("removed favorite {hex}");
        Ok(list)
    }

    /// Leave a color for a popup that is not open yet
    pub async fn set_last_picked(&self, hex: &str) -> Result<(), ListError> {
        self.store
            .set(LAST_PICKED_KEY, Value::String(hex.to_string()))
            .await?;
        Ok(())
    }

    /// Read and clear the handoff color in one store access
    pub async fn take_last_picked(&self) -> Result<Option<String>, ListError> {
        let Some(value) = self.store.take(LAST_PICKED_KEY).await? else {
            return Ok(None);
        };

        match value {
            Value::String(hex) if !hex.is_empty() => Ok(Some(hex)),
            other => {
                log::warn!("ignoring malformed {LAST_PICKED_KEY}: {other}");
                Ok(None)
            }
        }
    }

    async fn insert(&self, slot: ListSlot, hex: &str) -> Result<Vec<String>, ListError> {
        let mut list = self.read(slot).await?;
        push_front_unique(&mut list, hex, slot.capacity);
        self.write(slot, &list).await?;
        Ok(list)
    }

    async fn read(&self, slot: ListSlot) -> Result<Vec<String>, ListError> {
        match self.store.get(slot.key).await? {
            Some(value) => Ok(serde_json::from_value(value).map_err(StoreError::from)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, slot: ListSlot, list: &[String]) -> Result<(), ListError> {
        self.store.set(slot.key, serde_json::to_value(list).map_err(StoreError::from)?).await?;
        Ok(())
    }
}
