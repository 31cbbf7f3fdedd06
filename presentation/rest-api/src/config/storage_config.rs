use std::env;
use std::path::PathBuf;

use business::application::cart::store::DEFAULT_STORAGE_KEY;
use persistence::file_storage::FileStorage;

/// Backing store for the cart mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Memory,
}

impl StorageBackend {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "file" | "" => StorageBackend::File,
            other => {
                tracing::warn!("Unknown CART_STORAGE_BACKEND {:?}, using file", other);
                StorageBackend::File
            }
        }
    }
}

/// Where the persisted cart mirror lives.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub dir: PathBuf,
    pub key: String,
    /// Byte limit for the memory backend; `None` means unbounded.
    pub quota: Option<usize>,
}

fn parse_key(raw: Option<String>) -> String {
    match raw.map(|key| key.trim().to_string()) {
        Some(key) if FileStorage::is_valid_key(&key) => key,
        Some(key) if !key.is_empty() => {
            tracing::warn!(
                "Invalid CART_STORAGE_KEY {:?}, using {:?}",
                key,
                DEFAULT_STORAGE_KEY
            );
            DEFAULT_STORAGE_KEY.to_string()
        }
        _ => DEFAULT_STORAGE_KEY.to_string(),
    }
}

fn parse_quota(raw: Option<String>) -> Option<usize> {
    let raw = raw?;
    match raw.trim().parse::<usize>() {
        Ok(quota) => Some(quota),
        Err(_) => {
            tracing::warn!("Invalid CART_STORAGE_QUOTA {:?}, storage is unbounded", raw);
            None
        }
    }
}

impl StorageConfig {
    /// Load storage configuration from environment variables
    ///
    /// Environment variables:
    /// - CART_STORAGE_DIR: Directory holding stored documents (default: "./data")
    /// - CART_STORAGE_KEY: Key of the cart document, letters, digits, `-` and `_` (default: "cart")
    /// - CART_STORAGE_BACKEND: "file" or "memory" (default: "file")
    /// - CART_STORAGE_QUOTA: Byte limit of the memory backend (default: unbounded)
    pub fn from_env() -> Self {
        let backend = StorageBackend::parse(&env::var("CART_STORAGE_BACKEND").unwrap_or_default());
        let dir = env::var("CART_STORAGE_DIR").unwrap_or_else(|_| "./data".to_string());
        let key = parse_key(env::var("CART_STORAGE_KEY").ok());
        let quota = parse_quota(env::var("CART_STORAGE_QUOTA").ok());

        Self {
            backend,
            dir: PathBuf::from(dir),
            key,
            quota,
        }
    }

    /// Path of the cart document inside the storage directory.
    pub fn document_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }
}
