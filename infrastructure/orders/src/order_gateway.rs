use async_trait::async_trait;

use business::domain::order::errors::OrderError;
use business::domain::order::gateway::OrderGateway;
use business::domain::order::model::OrderLine;

use crate::client::OrdersClient;

/// Records orders through `POST {base}/api/orders`, one request per line item.
pub struct OrderGatewayHttp {
    client: OrdersClient,
}

impl OrderGatewayHttp {
    pub fn new(client: OrdersClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderGateway for OrderGatewayHttp {
    async fn submit(&self, order: &OrderLine) -> Result<(), OrderError> {
        let response = self
            .client
            .client
            .post(self.client.orders_url())
            .json(order)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(product_id = %order.product_id, "Order request failed: {err}");
                OrderError::SubmissionFailed
            })?;

        if !response.status().is_success() {
            tracing::error!(
                product_id = %order.product_id,
                status = %response.status(),
                "Order API rejected order"
            );
            return Err(OrderError::SubmissionFailed);
        }

        tracing::debug!(product_id = %order.product_id, quantity = order.quantity, "Order recorded");
        Ok(())
    }
}
