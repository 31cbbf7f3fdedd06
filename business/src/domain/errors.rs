/// Storage errors for domain layer.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage.unavailable")]
    Unavailable,
    #[error("storage.quota_exceeded")]
    QuotaExceeded,
    #[error("storage.io: {0}")]
    Io(#[from] std::io::Error),
}
