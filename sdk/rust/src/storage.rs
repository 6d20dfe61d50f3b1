//! Storage adapters backing the local fallback store

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};

/// Durable key/value text store scoped to the running client.
pub trait StorageAdapter: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &str) -> Option<String>;

    /// Set a value by key
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a value by key
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-memory storage adapter
///
/// Useful for testing or ephemeral storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.store.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut store = self.store.write().map_err(|_| StoreError::Poisoned)?;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut store = self.store.write().map_err(|_| StoreError::Poisoned)?;
        store.remove(key);
        Ok(())
    }
}

/// File-based storage adapter
///
/// Keeps every key in one JSON object on disk, rewritten on each change.
pub struct FileStorage {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// Create a file storage in the platform data directory for `app_name`
    ///
    /// Data is stored in:
    /// - Linux: `~/.local/share/{app_name}/funnel.json`
    /// - macOS: `~/Library/Application Support/{app_name}/funnel.json`
    /// - Windows: `C:\Users\{User}\AppData\Roaming\{app_name}\funnel.json`
    ///
    /// Returns `None` when no home/data directory can be resolved.
    #[cfg(feature = "native-storage")]
    pub fn new(app_name: &str) -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", app_name)?;
        Self::open(dirs.data_dir().join("funnel.json")).ok()
    }

    /// Open (or create on first write) the store at an explicit path
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let cache = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable local store {}: {}", path.display(), e);
                HashMap::new()
            })
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the cache to disk
    fn save(&self, cache: &HashMap<String, String>) -> StoreResult<()> {
        let contents = serde_json::to_string_pretty(cache)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl StorageAdapter for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut cache = self.cache.write().map_err(|_| StoreError::Poisoned)?;
        cache.insert(key.to_string(), value.to_string());
        self.save(&cache)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut cache = self.cache.write().map_err(|_| StoreError::Poisoned)?;
        cache.remove(key);
        self.save(&cache)
    }
}

impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .finish()
    }
}
