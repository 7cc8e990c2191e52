//! Backing key-value stores the plan store is persisted to.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::NamedTempFile;

use crate::error::{PlanError, PlanResult};

/// The single key holding the whole serialized plan store.
pub const PLANS_KEY: &str = "plans";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PlanResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PlanResult<()>;
}

/// One file per key inside a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        let slug = key.replace(['/', '\\', ':'], "_");
        self.dir.join(format!("{}.json", slug))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PlanResult<Option<String>> {
        let path = self.path(key);

        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| PlanError::Load(format!("{}: {}", path.display(), e)))
    }

    fn set(&self, key: &str, value: &str) -> PlanResult<()> {
        let persist_err = |e: std::io::Error| PlanError::Persist(e.to_string());

        std::fs::create_dir_all(&self.dir).map_err(persist_err)?;

        let path = self.path(key);

        // Each write gets its own temp file, renamed over the target, so
        // overlapping writers never share a half-written file.
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(persist_err)?;
        temp.write_all(value.as_bytes()).map_err(persist_err)?;
        temp.persist(&path).map_err(|e| persist_err(e.error))?;
        Ok(())
    }
}

/// In-memory store. Keeps a log of every write, and can be told to fail
/// writes to simulate a full disk.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    writes: Vec<String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.values.insert(key.to_string(), value.to_string());
        }
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    /// Every value written so far, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.writes.clone())
            .unwrap_or_default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PlanResult<Option<String>> {
        let inner = self
            .inner
            .lock()
            .map_err(|e| PlanError::Load(e.to_string()))?;
        Ok(inner.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PlanResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| PlanError::Persist(e.to_string()))?;

        if inner.fail_writes {
            return Err(PlanError::Persist("storage quota exceeded".to_string()));
        }

        inner.values.insert(key.to_string(), value.to_string());
        inner.writes.push(value.to_string());
        Ok(())
    }
}
