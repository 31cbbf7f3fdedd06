use crate::domain::errors::StorageError;

/// Port for the durable key-value store holding the persisted cart mirror.
///
/// Calls are synchronous: a cart mutation and its mirror write complete
/// before control returns to the caller.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the stored value, or `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
