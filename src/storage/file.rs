use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::{Store, StoreError};

/// A store kept as one JSON object on disk.
///
/// The file is re-read on every access so that separate processes (the popup
/// and a `pipette pick` run) observe each other's writes. Accesses within one
/// process are serialized, which keeps a write of one key from dropping a
/// concurrent write of another key.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Open the store at its default location under the user's data dir
    pub fn open_default() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    /// `<data_dir>/pipette/storage.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("pipette").join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Map::new());
            }
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject),
        }
    }

    async fn write_all(&self, map: Map<String, Value>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let payload = serde_json::to_string_pretty(&Value::Object(map))?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, payload.as_bytes()).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_all().await?;
        Ok(map.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_all().await?;
        map.insert(key.to_string(), value);
        self.write_all(map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_all().await?;
        if map.remove(key).is_some() {
            self.write_all(map).await?;
        }
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_all().await?;
        let value = map.remove(key);
        if value.is_some() {
            self.write_all(map).await?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("nested").join("storage.json"))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.get("colors").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set("colors", json!(["#AABBCC"])).await.unwrap();

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.get("colors").await.unwrap(),
            Some(json!(["#AABBCC"]))
        );
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set("colors", json!(["#111111"])).await.unwrap();
        store.set("colorHistory", json!(["#222222"])).await.unwrap();
        store.remove("colors").await.unwrap();

        assert!(store.get("colors").await.unwrap().is_none());
        assert_eq!(
            store.get("colorHistory").await.unwrap(),
            Some(json!(["#222222"]))
        );
    }

    #[tokio::test]
    async fn take_returns_and_clears_only_that_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set("lastPickedColor", json!("#2ECC71")).await.unwrap();
        store.set("colors", json!(["#111111"])).await.unwrap();

        assert_eq!(
            store.take("lastPickedColor").await.unwrap(),
            Some(json!("#2ECC71"))
        );
        assert!(store_in(&dir).get("lastPickedColor").await.unwrap().is_none());
        assert_eq!(store.get("colors").await.unwrap(), Some(json!(["#111111"])));
        assert!(store.take("lastPickedColor").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set("colors", json!([])).await.unwrap();
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn non_object_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::new(path);
        assert!(matches!(
            store.get("colors").await,
            Err(StoreError::NotAnObject)
        ));
    }
}
