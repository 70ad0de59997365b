//! Persistent key-value storage shared by the popup and the background
//! service.
//!
//! Values are plain JSON. Apart from `take`, there are no transactions:
//! callers that need a read-modify-write do it themselves, and concurrent
//! writers of the same key race with last-write-wins.

mod errors;
mod file;
mod memory;

use std::future::Future;

use serde_json::Value;

pub use errors::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub trait Store: Send + Sync {
    /// Read a key; `None` when it was never set or has been removed
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Read and remove a key.
    ///
    /// The default is a `get` followed by a `remove`. Stores that can hold
    /// one lock across both override it so no write lands in between.
    fn take(&self, key: &str) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send {
        async move {
            let value = self.get(key).await?;
            if value.is_some() {
                self.remove(key).await?;
            }
            Ok(value)
        }
    }
}
