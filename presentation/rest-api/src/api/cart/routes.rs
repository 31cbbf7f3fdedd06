use std::sync::Arc;

use poem_openapi::{OpenApi, param::Path, payload::Json};

use business::application::cart::store::CartStore;
use business::domain::cart::model::ProductSnapshot;

use crate::api::cart::badge::BadgeCounter;
use crate::api::cart::dto::{
    AddItemRequest, AdjustQuantityRequest, BadgeResponse, CartResponse, MAX_QUANTITY,
    SetQuantityRequest,
};
use crate::api::error::ErrorResponse;
use crate::api::tags::ApiTags;

pub struct CartApi {
    store: Arc<CartStore>,
    badge: Arc<BadgeCounter>,
}

impl CartApi {
    pub fn new(store: Arc<CartStore>, badge: Arc<BadgeCounter>) -> Self {
        Self { store, badge }
    }

    fn current_cart(&self) -> Json<CartResponse> {
        Json(CartResponse::from(&self.store.snapshot()))
    }
}

/// Shopping cart API
///
/// Unknown product ids are ignored by the update endpoints rather than
/// reported as errors.
#[OpenApi]
impl CartApi {
    /// Get the cart
    ///
    /// Returns the line items with item count and total.
    #[oai(path = "/cart", method = "get", tag = "ApiTags::Cart")]
    async fn get_cart(&self) -> Json<CartResponse> {
        self.current_cart()
    }

    /// Add a product
    ///
    /// Adds one unit of the product. Adding a product already in the cart
    /// increments its quantity and keeps the title and prices captured the
    /// first time. Prices a decimal amount cannot hold are rejected.
    #[oai(path = "/cart/items", method = "post", tag = "ApiTags::Cart")]
    async fn add_item(&self, body: Json<AddItemRequest>) -> CartUpdateResponse {
        if body.0.id.trim().is_empty() {
            return CartUpdateResponse::BadRequest(ErrorResponse::validation("cart.missing_id"));
        }

        match ProductSnapshot::try_from(body.0) {
            Ok(product) => {
                self.store.add_item(product);
                CartUpdateResponse::Ok(self.current_cart())
            }
            Err(message) => CartUpdateResponse::BadRequest(ErrorResponse::validation(message)),
        }
    }

    /// Set a quantity
    ///
    /// A quantity below one removes the item. Quantities above 4294967295
    /// are rejected.
    #[oai(path = "/cart/items/:id", method = "put", tag = "ApiTags::Cart")]
    async fn set_quantity(
        &self,
        id: Path<String>,
        body: Json<SetQuantityRequest>,
    ) -> CartUpdateResponse {
        if body.0.quantity > MAX_QUANTITY {
            return CartUpdateResponse::BadRequest(ErrorResponse::validation(
                "cart.invalid_quantity",
            ));
        }

        self.store.set_quantity(&id.0, body.0.quantity);
        CartUpdateResponse::Ok(self.current_cart())
    }

    /// Adjust a quantity
    ///
    /// Adds `delta` to the current quantity; reaching zero removes the item.
    #[oai(path = "/cart/items/:id/adjust", method = "post", tag = "ApiTags::Cart")]
    async fn adjust_quantity(
        &self,
        id: Path<String>,
        body: Json<AdjustQuantityRequest>,
    ) -> Json<CartResponse> {
        self.store.adjust_quantity(&id.0, body.0.delta);
        self.current_cart()
    }

    /// Remove a product
    #[oai(path = "/cart/items/:id", method = "delete", tag = "ApiTags::Cart")]
    async fn remove_item(&self, id: Path<String>) -> NoContentResponse {
        self.store.remove_item(&id.0);
        NoContentResponse::NoContent
    }

    /// Empty the cart
    #[oai(path = "/cart", method = "delete", tag = "ApiTags::Cart")]
    async fn clear(&self) -> NoContentResponse {
        self.store.clear();
        NoContentResponse::NoContent
    }

    /// Badge count
    ///
    /// Number of units in the cart, maintained from change notifications.
    #[oai(path = "/cart/badge", method = "get", tag = "ApiTags::Cart")]
    async fn badge(&self) -> Json<BadgeResponse> {
        Json(BadgeResponse {
            count: self.badge.count(),
        })
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum CartUpdateResponse {
    #[oai(status = 200)]
    Ok(Json<CartResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum NoContentResponse {
    #[oai(status = 204)]
    NoContent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use logger::TracingLogger;
    use persistence::memory_storage::MemoryStorage;

    fn cart_api() -> (CartApi, Arc<CartStore>) {
        let store = Arc::new(CartStore::initialize(
            Arc::new(MemoryStorage::new()),
            Arc::new(TracingLogger),
        ));
        let badge = Arc::new(BadgeCounter::new(&store.summary()));
        store.subscribe(badge.clone());
        (CartApi::new(store.clone(), badge), store)
    }

    fn add_request(id: &str, sale_price: Option<f64>) -> Json<AddItemRequest> {
        Json(AddItemRequest {
            id: id.to_string(),
            title: Some("Kettle".to_string()),
            category: None,
            image: None,
            old_price: None,
            sale_price,
        })
    }

    fn bad_request_message(response: CartUpdateResponse) -> String {
        match response {
            CartUpdateResponse::BadRequest(Json(body)) => body.message,
            CartUpdateResponse::Ok(_) => panic!("expected bad request"),
        }
    }

    #[tokio::test]
    async fn should_add_item_and_update_badge() {
        let (api, _store) = cart_api();

        let response = api.add_item(add_request("c", Some(9.99))).await;

        match response {
            CartUpdateResponse::Ok(Json(cart)) => {
                assert_eq!(cart.item_count, 1);
                assert_eq!(cart.formatted_total, "9.99");
            }
            CartUpdateResponse::BadRequest(_) => panic!("expected cart"),
        }
        assert_eq!(api.badge().await.0.count, 1);
    }

    #[tokio::test]
    async fn should_reject_price_that_cannot_be_held() {
        let (api, store) = cart_api();

        let response = api.add_item(add_request("c", Some(1e30))).await;

        assert_eq!(bad_request_message(response), "cart.invalid_amount");
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn should_reject_blank_product_id() {
        let (api, store) = cart_api();

        let response = api.add_item(add_request("  ", Some(5.0))).await;

        assert_eq!(bad_request_message(response), "cart.missing_id");
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn should_reject_quantity_beyond_line_capacity() {
        let (api, store) = cart_api();
        api.add_item(add_request("c", Some(9.99))).await;

        let response = api
            .set_quantity(
                Path("c".to_string()),
                Json(SetQuantityRequest {
                    quantity: 5_000_000_000,
                }),
            )
            .await;

        assert_eq!(bad_request_message(response), "cart.invalid_quantity");
        assert_eq!(store.item_count(), 1);
    }

    #[tokio::test]
    async fn should_set_largest_allowed_quantity_exactly() {
        let (api, store) = cart_api();
        api.add_item(add_request("c", Some(1.0))).await;

        let response = api
            .set_quantity(
                Path("c".to_string()),
                Json(SetQuantityRequest {
                    quantity: MAX_QUANTITY,
                }),
            )
            .await;

        assert!(matches!(response, CartUpdateResponse::Ok(_)));
        assert_eq!(store.item_count(), u64::from(u32::MAX));
    }
}
