use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use business::domain::order::model::CustomerDetails;
use business::domain::order::use_cases::place_order::{PlaceOrderParams, PlaceOrderUseCase};

use crate::api::checkout::dto::{CheckoutRequest, CheckoutResponse};
use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::tags::ApiTags;

pub struct CheckoutApi {
    place_order_use_case: Arc<dyn PlaceOrderUseCase>,
}

impl CheckoutApi {
    pub fn new(place_order_use_case: Arc<dyn PlaceOrderUseCase>) -> Self {
        Self {
            place_order_use_case,
        }
    }
}

/// Checkout API
#[OpenApi]
impl CheckoutApi {
    /// Place the order
    ///
    /// Records one order per cart line with the customer's details and takes
    /// the ordered units out of the cart once every order is accepted. On
    /// failure the cart is left as it was. A checkout started while another
    /// is still in flight is rejected with 409.
    #[oai(path = "/checkout", method = "post", tag = "ApiTags::Checkout")]
    async fn checkout(&self, body: Json<CheckoutRequest>) -> PlaceOrderResponse {
        let request = body.0;
        let customer = match CustomerDetails::new(
            request.name,
            request.email,
            request.address,
            request.city,
            request.phone1,
            request.phone2,
        ) {
            Ok(customer) => customer,
            Err(err) => {
                let (_status, json) = err.into_error_response();
                return PlaceOrderResponse::BadRequest(json);
            }
        };

        match self
            .place_order_use_case
            .execute(PlaceOrderParams { customer })
            .await
        {
            Ok(receipt) => PlaceOrderResponse::Created(Json(receipt.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => PlaceOrderResponse::BadRequest(json),
                    409 => PlaceOrderResponse::Conflict(json),
                    _ => PlaceOrderResponse::BadGateway(json),
                }
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum PlaceOrderResponse {
    #[oai(status = 201)]
    Created(Json<CheckoutResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),
    #[oai(status = 502)]
    BadGateway(Json<ErrorResponse>),
}
