//! JSON-file counter store.
//!
//! The whole mapping lives in memory behind one reader/writer lock and is
//! re-serialized to a single flat JSON object on every mutation. Writers
//! hold the lock across mutate + flush, so the backing file always reflects
//! a definite serialization order of completed writes and readers never
//! observe a count that has not been durably written.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::sync::RwLock;

use orbot_core::store::CounterStore;
use orbot_types::error::StoreError;

/// File-backed implementation of `CounterStore`.
///
/// One coarse lock guards the mapping; sized for the dozens-to-hundreds of
/// keys a single guild produces. Only one process may own a backing file.
#[derive(Debug)]
pub struct JsonCounterStore {
    entries: RwLock<HashMap<String, i64>>,
    path: PathBuf,
}

impl JsonCounterStore {
    /// Open a store backed by `path`.
    ///
    /// A missing file is a valid initial state (empty mapping). An existing
    /// file that cannot be read or parsed fails construction: proceeding
    /// with unknown state would risk serving wrong counts.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no counter file, starting empty");
                HashMap::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            entries: RwLock::new(entries),
            path,
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Serialize the full mapping and replace the backing file.
    ///
    /// Writes to a sibling temp file and renames it over the target, so a
    /// crash mid-write leaves the previous durable state intact.
    async fn save(&self, entries: &HashMap<String, i64>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(entries).map_err(StoreError::Serialize)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

impl CounterStore for JsonCounterStore {
    async fn get(&self, key: &str) -> i64 {
        self.entries.read().await.get(key).copied().unwrap_or(0)
    }

    async fn set(&self, key: &str, value: i64) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let prev = entries.insert(key.to_string(), value);
        match self.save(&entries).await {
            Ok(()) => Ok(()),
            Err(err) => {
                // A count that never reached disk must not stay visible.
                match prev {
                    Some(v) => entries.insert(key.to_string(), v),
                    None => entries.remove(key),
                };
                Err(err)
            }
        }
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let prev = entries.get(key).copied();
        *entries.entry(key.to_string()).or_insert(0) += delta;
        match self.save(&entries).await {
            Ok(()) => Ok(()),
            Err(err) => {
                match prev {
                    Some(v) => entries.insert(key.to_string(), v),
                    None => entries.remove(key),
                };
                Err(err)
            }
        }
    }

    async fn entries(&self) -> Vec<(String, i64)> {
        let entries = self.entries.read().await;
        let mut all: Vec<_> = entries.iter().map(|(k, v)| (k.clone(), *v)).collect();
        all.sort();
        all
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    async fn open_in(dir: &TempDir) -> JsonCounterStore {
        JsonCounterStore::open(dir.path().join("counters.json"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn absent_file_bootstraps_empty() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp).await;

        assert_eq!(store.get("anyone").await, 0);
        assert!(store.entries().await.is_empty());
    }

    #[tokio::test]
    async fn get_defaults_to_zero_for_unwritten_keys() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp).await;

        store.set("user123", 2).await.unwrap();
        assert_eq!(store.get("user456").await, 0);
    }

    #[tokio::test]
    async fn set_then_get_for_negative_and_zero() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp).await;

        for value in [5, 0, -7] {
            store.set("user123", value).await.unwrap();
            assert_eq!(store.get("user123").await, value);
        }
    }

    #[tokio::test]
    async fn increment_is_additive() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp).await;

        for delta in [1, 4, -2, 1] {
            store.increment("user123", delta).await.unwrap();
        }
        assert_eq!(store.get("user123").await, 4);
    }

    #[tokio::test]
    async fn set_then_negative_increment() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp).await;

        store.set("user2", 5).await.unwrap();
        store.increment("user2", -2).await.unwrap();
        assert_eq!(store.get("user2").await, 3);
    }

    #[tokio::test]
    async fn claims_accumulate_without_ceiling() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp).await;

        for _ in 0..3 {
            store.increment("u1", 1).await.unwrap();
        }
        assert_eq!(store.get("u1").await, 3);

        // Any ceiling is caller policy; the store keeps counting.
        store.increment("u1", 1).await.unwrap();
        assert_eq!(store.get("u1").await, 4);
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("counters.json");

        let store = JsonCounterStore::open(&path).await.unwrap();
        store.set("user123", 2).await.unwrap();
        store.increment("user456", 1).await.unwrap();
        store.increment("user456", 1).await.unwrap();
        drop(store);

        let reopened = JsonCounterStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("user123").await, 2);
        assert_eq!(reopened.get("user456").await, 2);
        assert_eq!(reopened.get("never-written").await, 0);
    }

    #[tokio::test]
    async fn backing_file_is_a_flat_json_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("counters.json");

        let store = JsonCounterStore::open(&path).await.unwrap();
        store.set("user123", 2).await.unwrap();
        store.set("user456", 0).await.unwrap();

        let on_disk: HashMap<String, i64> =
            serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk["user123"], 2);
        assert_eq!(on_disk["user456"], 0);
    }

    #[tokio::test]
    async fn corrupt_file_fails_open() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("counters.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let err = JsonCounterStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn wrong_shape_fails_open() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("counters.json");
        tokio::fs::write(&path, br#"{"user123": "two"}"#)
            .await
            .unwrap();

        let err = JsonCounterStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn concurrent_increments_lose_no_updates() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(open_in(&tmp).await);

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.increment("u1", 1).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.get("u1").await, 32);

        // The file reflects every completed write too.
        let on_disk: HashMap<String, i64> =
            serde_json::from_slice(&tokio::fs::read(store.path()).await.unwrap()).unwrap();
        assert_eq!(on_disk["u1"], 32);
    }

    #[tokio::test]
    async fn failed_flush_rolls_back_the_mutation() {
        let tmp = TempDir::new().unwrap();
        // Parent directory never exists, so the flush cannot succeed.
        let store = JsonCounterStore::open(tmp.path().join("missing").join("counters.json"))
            .await
            .unwrap();

        store.increment("u1", 1).await.unwrap_err();
        assert_eq!(store.get("u1").await, 0);

        store.set("u2", 9).await.unwrap_err();
        assert_eq!(store.get("u2").await, 0);
        assert!(store.entries().await.is_empty());
    }
}
