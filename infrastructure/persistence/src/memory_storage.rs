use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use business::domain::cart::storage::KeyValueStorage;
use business::domain::errors::StorageError;

/// In-process key-value storage.
///
/// An optional byte quota bounds the sum of key and value lengths, mirroring
/// the per-origin limit of browser local storage.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();
            if others + key.len() + value.len() > quota {
                tracing::warn!(key, quota, "Storage quota exceeded");
                return Err(StorageError::QuotaExceeded);
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use business::application::cart::store::CartStore;
    use business::domain::cart::model::ProductSnapshot;
    use business::domain::logger::Logger;

    struct NullLogger;

    impl Logger for NullLogger {
        fn info(&self, _message: &str) {}
        fn warn(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
        fn debug(&self, _message: &str) {}
    }

    #[test]
    fn should_store_and_remove_values() {
        let storage = MemoryStorage::new();

        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));

        storage.remove("cart").unwrap();
        assert!(storage.get("cart").unwrap().is_none());
    }

    #[test]
    fn should_reject_write_over_quota() {
        let storage = MemoryStorage::with_quota(10);

        assert!(storage.set("cart", "[1,2]").is_ok());
        assert!(storage.set("x", "[]").is_err());
        assert!(matches!(
            storage.set("cart", "[1,2,3,4,5]"),
            Err(StorageError::QuotaExceeded)
        ));
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn should_keep_cart_usable_when_quota_exhausted() {
        let storage = Arc::new(MemoryStorage::with_quota(8));
        let store = CartStore::initialize(storage.clone(), Arc::new(NullLogger));

        store.add_item(ProductSnapshot::new("a").with_title("Pan"));
        store.add_item(ProductSnapshot::new("a"));

        assert_eq!(store.item_count(), 2);
        assert!(storage.get("cart").unwrap().is_none());
    }

    #[test]
    fn should_restore_cart_across_store_instances() {
        let storage = Arc::new(MemoryStorage::new());
        let first = CartStore::initialize(storage.clone(), Arc::new(NullLogger));
        first.add_item(ProductSnapshot::new("a"));
        first.add_item(ProductSnapshot::new("b"));
        first.set_quantity("b", 4);

        let second = CartStore::initialize(storage, Arc::new(NullLogger));

        assert_eq!(second.snapshot(), first.snapshot());
        assert_eq!(second.item_count(), 5);
    }
}
