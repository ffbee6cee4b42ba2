//! Storage primitives for board persistence
//!
//! A store is a durable key-value map of JSON documents. No board logic
//! lives here, just reads and writes; the persistence gateway decides when
//! to call them.

use crate::error::{LeadsError, Result};
use async_trait::async_trait;
use fs2::FileExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::fs;

/// Durable key-value storage used by the persistence gateway
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`, `None` if absent
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the document stored under `key` (absent is fine)
    async fn remove(&self, key: &str) -> Result<()>;
}

// =============================================================================
// File-backed store
// =============================================================================

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory (created on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for a key
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Path of the lock file for a key
    pub fn lock_path(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.root.join(format!(".{key}.lock")))
    }

    /// Try to acquire the exclusive write lock for a key (non-blocking)
    pub async fn lock(&self, key: &str) -> Result<StoreLock> {
        let lock_path = self.lock_path(key)?;
        fs::create_dir_all(&self.root).await?;

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(StoreLock {
                file,
                path: lock_path,
            }),
            Err(_) => Err(LeadsError::LockBusy { path: lock_path }),
        }
    }
}

fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(LeadsError::invalid_value("storage key", format!("'{key}' is not a plain name")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path).await?))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let _lock = self.lock(key).await?;
        atomic_write(&path, value.as_bytes()).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }
}

/// RAII lock guard - releases on drop
pub struct StoreLock {
    file: std::fs::File,
    path: PathBuf,
}

impl StoreLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;

    // Rename (atomic on same filesystem)
    fs::rename(&temp_path, path).await?;

    Ok(())
}

// =============================================================================
// In-memory store
// =============================================================================

/// Process-local store. Counts writes and can be told to fail, which makes
/// it the store of choice for tests and for hosts that need no durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries_guard().insert(key.into(), value.into());
        self
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current document under a key
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries_guard().get(key).cloned()
    }

    /// Make every read and write fail until switched back
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(LeadsError::storage("memory store is unavailable"))
        } else {
            Ok(())
        }
    }

    fn entries_guard(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.entries_guard().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.entries_guard().remove(key);
        Ok(())
    }
}
