/// Errors raised while decoding a persisted cart.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("cart.malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("cart.duplicate_item: {0}")]
    DuplicateItem(String),
    #[error("cart.invalid_quantity: {0}")]
    InvalidQuantity(String),
}
