use async_trait::async_trait;

use super::errors::OrderError;
use super::model::OrderLine;

/// Service port for the external order API.
///
/// Each call records one order for one line item.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit(&self, order: &OrderLine) -> Result<(), OrderError>;
}
