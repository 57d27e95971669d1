// Local result store: one JSON file holding the full record collection
//
// The collection lives in memory behind a RwLock and is written out
// whole on every mutation, newest-first. A missing or unparsable file
// is an empty collection, never an error. Every mutate+persist runs
// inside one async mutex critical section, so the whole-collection
// atomicity assumption survives a multi-threaded runtime: a stale
// snapshot can never overwrite a newer one on disk.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::errors::{StoreError, StoreResult};
use crate::core::types::ResultRecord;

/// Fixed, versionless namespace for the persisted collection. Matches
/// the browser-era localStorage key so exported collections carry over.
const STORE_FILE: &str = "text-scribe-summaries.json";

/// Persists, retrieves and deletes result records. Owns the entire
/// collection; cheap to clone and share.
#[derive(Clone)]
pub struct ResultStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    records: RwLock<Vec<ResultRecord>>,
    store_file: PathBuf,
    /// Held across mutate+persist; the RwLock alone only covers the
    /// in-memory half of the read-modify-write
    write_lock: tokio::sync::Mutex<()>,
}

impl ResultStore {
    /// Open the store under `data_dir`, creating the directory if
    /// needed and loading any existing collection. A corrupt file is
    /// logged and treated as empty.
    pub async fn new(data_dir: &str) -> StoreResult<Self> {
        let data_path = Path::new(data_dir);
        if !data_path.exists() {
            tokio::fs::create_dir_all(data_path).await.map_err(|source| {
                StoreError::DirectoryCreationFailed {
                    path: data_dir.to_string(),
                    source,
                }
            })?;
        }

        let store_file = data_path.join(STORE_FILE);

        let records = if store_file.exists() {
            match tokio::fs::read_to_string(&store_file).await {
                Ok(data) => serde_json::from_str::<Vec<ResultRecord>>(&data).unwrap_or_else(|e| {
                    warn!("store file unparsable, starting empty: {}", e);
                    Vec::new()
                }),
                Err(e) => {
                    warn!("store file unreadable, starting empty: {}", e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        info!(records = records.len(), file = %store_file.display(), "result store ready");

        Ok(Self {
            inner: Arc::new(StoreInner {
                records: RwLock::new(records),
                store_file,
                write_lock: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// Prepend `record` (newest-first) and persist the collection.
    ///
    /// On a persistence failure the error is returned so the caller
    /// can decide whether to notify the user, but the in-memory
    /// collection keeps the record either way.
    pub async fn save(&self, record: ResultRecord) -> StoreResult<()> {
        let _write = self.inner.write_lock.lock().await;

        let snapshot = {
            let mut records = self.inner.records.write();
            records.insert(0, record);
            records.clone()
        };

        self.persist(&snapshot).await
    }

    /// All records, newest-first. Empty collection if none exist.
    pub fn list(&self) -> Vec<ResultRecord> {
        self.inner.records.read().clone()
    }

    /// Remove the record with matching `id`. A no-op, not an error,
    /// when no such record exists.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let _write = self.inner.write_lock.lock().await;

        let snapshot = {
            let mut records = self.inner.records.write();
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                return Ok(());
            }
            records.clone()
        };

        self.persist(&snapshot).await
    }

    /// Remove all records and the backing file.
    pub async fn clear(&self) -> StoreResult<()> {
        let _write = self.inner.write_lock.lock().await;

        self.inner.records.write().clear();

        if self.inner.store_file.exists() {
            tokio::fs::remove_file(&self.inner.store_file)
                .await
                .map_err(|source| StoreError::WriteFailed {
                    path: self.inner.store_file.display().to_string(),
                    source,
                })?;
        }

        Ok(())
    }

    async fn persist(&self, records: &[ResultRecord]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(records)?;

        tokio::fs::write(&self.inner.store_file, json)
            .await
            .map_err(|source| StoreError::WriteFailed {
                path: self.inner.store_file.display().to_string(),
                source,
            })
    }
}
