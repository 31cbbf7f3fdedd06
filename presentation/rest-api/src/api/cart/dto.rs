use num_traits::ToPrimitive;
use poem_openapi::Object;
use rust_decimal::Decimal;

use business::domain::cart::model::{Cart, LineItem, ProductSnapshot};
use business::domain::cart::money::amount_from_f64;

fn as_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct AddItemRequest {
    /// Catalog product identifier
    pub id: String,
    /// Product title shown in the cart
    #[oai(skip_serializing_if_is_none)]
    pub title: Option<String>,
    /// Product category (defaults to "Uncategorized")
    #[oai(skip_serializing_if_is_none)]
    pub category: Option<String>,
    /// Image asset reference
    #[oai(skip_serializing_if_is_none)]
    pub image: Option<String>,
    /// Price before discount
    #[oai(skip_serializing_if_is_none)]
    pub old_price: Option<f64>,
    /// Price charged at checkout
    #[oai(skip_serializing_if_is_none)]
    pub sale_price: Option<f64>,
}

fn request_amount(value: Option<f64>) -> Result<Option<Decimal>, &'static str> {
    value
        .map(|value| amount_from_f64(value).ok_or("cart.invalid_amount"))
        .transpose()
}

impl TryFrom<AddItemRequest> for ProductSnapshot {
    type Error = &'static str;

    /// Fails with `cart.invalid_amount` when a price cannot be held exactly.
    fn try_from(request: AddItemRequest) -> Result<Self, Self::Error> {
        Ok(ProductSnapshot {
            old_price: request_amount(request.old_price)?,
            sale_price: request_amount(request.sale_price)?,
            id: request.id,
            title: request.title,
            category: request.category,
            image: request.image,
        })
    }
}

/// Largest quantity a line item can hold.
pub const MAX_QUANTITY: i64 = u32::MAX as i64;

#[derive(Debug, Clone, Object)]
pub struct SetQuantityRequest {
    /// New quantity; anything below one removes the item
    pub quantity: i64,
}

#[derive(Debug, Clone, Object)]
pub struct AdjustQuantityRequest {
    /// Amount added to the current quantity (negative to decrement)
    pub delta: i64,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image: String,
    pub old_price: f64,
    pub sale_price: f64,
    pub quantity: u32,
    /// Sale price times quantity
    pub subtotal: f64,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            category: item.category.clone(),
            image: item.image.clone(),
            old_price: as_f64(item.old_price),
            sale_price: as_f64(item.sale_price),
            quantity: item.quantity,
            subtotal: as_f64(item.subtotal()),
        }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct CartResponse {
    /// Line items in the order they were first added
    pub items: Vec<LineItemResponse>,
    /// Sum of quantities
    pub item_count: u64,
    /// Sum of sale price times quantity
    pub total: f64,
    /// Total rounded to cents for display
    pub formatted_total: String,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        let total = cart.total();
        Self {
            items: cart.items().iter().map(LineItemResponse::from).collect(),
            item_count: cart.item_count(),
            total: as_f64(total),
            formatted_total: format!("{:.2}", total),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct BadgeResponse {
    /// Number of units in the cart
    pub count: u64,
}
