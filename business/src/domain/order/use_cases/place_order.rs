use async_trait::async_trait;

use crate::domain::order::errors::OrderError;
use crate::domain::order::model::{CheckoutReceipt, CustomerDetails};

pub struct PlaceOrderParams {
    pub customer: CustomerDetails,
}

#[async_trait]
pub trait PlaceOrderUseCase: Send + Sync {
    async fn execute(&self, params: PlaceOrderParams) -> Result<CheckoutReceipt, OrderError>;
}
