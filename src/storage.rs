//! Persistence of the user's on/off intent.
//!
//! The real backend is a key/value store that syncs across devices with
//! eventual consistency. Nothing here treats it as authoritative: a page
//! reads it once at load and writes it after each toggle, last write wins.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A boolean key/value store.
pub trait PreferenceStore: Send + Sync {
    /// Reads `key`. A missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<bool>>>;

    fn set(&self, key: &str, value: bool) -> BoxFuture<'_, Result<()>>;
}

/// Process-local store. Clones share the same map. Reads and writes can be
/// made to fail to emulate an unreachable backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, bool>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Current value of `key`, bypassing failure injection.
    pub fn value(&self, key: &str) -> Option<bool> {
        self.values.lock().ok().and_then(|map| map.get(key).copied())
    }

    fn read(&self, key: &str) -> Result<Option<bool>> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("read denied".to_string()));
        }

        let map = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(map.get(key).copied())
    }

    fn write(&self, key: &str, value: bool) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("write denied".to_string()));
        }

        let mut map = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        map.insert(key.to_string(), value);
        Ok(())
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<bool>>> {
        let result = self.read(key);
        async move { result }.boxed()
    }

    fn set(&self, key: &str, value: bool) -> BoxFuture<'_, Result<()>> {
        let result = self.write(key, value);
        async move { result }.boxed()
    }
}

/// Stores all preferences of one profile in a single JSON object on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, bool>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<bool>>> {
        let key = key.to_string();
        async move {
            let values = self.read_all().await?;
            Ok(values.get(&key).copied())
        }
        .boxed()
    }

    fn set(&self, key: &str, value: bool) -> BoxFuture<'_, Result<()>> {
        let key = key.to_string();
        async move {
            let mut values = self.read_all().await?;
            values.insert(key, value);

            if let Some(dir) = self.path.parent() {
                tokio::fs::create_dir_all(dir).await?;
            }

            debug!("writing preferences to {:?}", self.path);
            let json = serde_json::to_string_pretty(&values)?;
            tokio::fs::write(&self.path, json).await?;
            Ok(())
        }
        .boxed()
    }
}
