use num_traits::ToPrimitive;
use poem_openapi::Object;

use business::domain::order::model::CheckoutReceipt;

#[derive(Debug, Clone, Object)]
pub struct CheckoutRequest {
    /// Customer full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Primary phone number
    pub phone1: String,
    /// Alternate phone number
    #[oai(skip_serializing_if_is_none)]
    pub phone2: Option<String>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Number of orders recorded, one per cart line
    pub orders_placed: u64,
    /// Units ordered
    pub item_count: u64,
    /// Amount charged
    pub total: f64,
}

impl From<CheckoutReceipt> for CheckoutResponse {
    fn from(receipt: CheckoutReceipt) -> Self {
        Self {
            orders_placed: receipt.orders_placed as u64,
            item_count: receipt.item_count,
            total: receipt.total.to_f64().unwrap_or_default(),
        }
    }
}
