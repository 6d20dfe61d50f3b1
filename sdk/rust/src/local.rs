//! Local fallback store: the client-side mirror of the purchase and lead collections.
//!
//! Each namespace is one ordered JSON array stored under a single key. Every
//! operation reads or rewrites the whole array, so concurrent writers through
//! different handles can lose updates (last write wins per collection).

use std::sync::Arc;

use crate::error::StoreResult;
use crate::models::Record;
use crate::storage::StorageAdapter;

/// Collection held by the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Purchases,
    Leads,
}

impl Namespace {
    pub fn key(&self) -> &'static str {
        match self {
            Namespace::Purchases => "customer_purchases",
            Namespace::Leads => "customer_leads",
        }
    }

    pub fn all() -> [Namespace; 2] {
        [Namespace::Purchases, Namespace::Leads]
    }
}

/// Namespaced record store over an optional [`StorageAdapter`].
///
/// Without an adapter every read yields an empty collection and every write
/// is a no-op, which is how a context with no persistent storage behaves.
#[derive(Clone, Default)]
pub struct LocalStore {
    adapter: Option<Arc<dyn StorageAdapter>>,
}

impl LocalStore {
    pub fn new(adapter: impl StorageAdapter + 'static) -> Self {
        Self {
            adapter: Some(Arc::new(adapter)),
        }
    }

    pub fn from_shared(adapter: Arc<dyn StorageAdapter>) -> Self {
        Self {
            adapter: Some(adapter),
        }
    }

    /// A store with no backing storage at all.
    pub fn unavailable() -> Self {
        Self { adapter: None }
    }

    pub fn is_available(&self) -> bool {
        self.adapter.is_some()
    }

    /// All records of `T`'s namespace in insertion order.
    pub fn read_all<T: Record>(&self) -> Vec<T> {
        let Some(adapter) = &self.adapter else {
            return Vec::new();
        };
        let key = T::NAMESPACE.key();
        match adapter.get(key) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Local collection {} is unreadable, treating as empty: {}", key, e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    pub fn append_one<T: Record>(&self, record: &T) -> StoreResult<()> {
        if self.adapter.is_none() {
            return Ok(());
        }
        let mut records: Vec<T> = self.read_all();
        records.push(record.clone());
        self.write_all(&records)
    }

    /// Find the record with `id`, let `merge` change it in place and persist the collection.
    ///
    /// Returns the updated record, or `None` (collection untouched) if no record matches.
    pub fn update_one<T: Record>(&self, id: &str, merge: impl FnOnce(&mut T)) -> StoreResult<Option<T>> {
        if self.adapter.is_none() {
            return Ok(None);
        }
        let mut records: Vec<T> = self.read_all();
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        merge(record);
        let updated = record.clone();
        self.write_all(&records)?;
        Ok(Some(updated))
    }

    pub fn clear(&self, namespace: Namespace) -> StoreResult<()> {
        match &self.adapter {
            Some(adapter) => adapter.remove(namespace.key()),
            None => Ok(()),
        }
    }

    fn write_all<T: Record>(&self, records: &[T]) -> StoreResult<()> {
        let Some(adapter) = &self.adapter else {
            return Ok(());
        };
        let raw = serde_json::to_string(records)?;
        adapter.set(T::NAMESPACE.key(), &raw)
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("available", &self.is_available())
            .finish()
    }
}
