use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::order::errors::OrderError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for OrderError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name, message) = match &self {
            OrderError::EmptyCart => (StatusCode::BAD_REQUEST, "EmptyCart", "order.empty_cart"),
            OrderError::CustomerNameEmpty => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "order.customer_name_empty",
            ),
            OrderError::EmailInvalid => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "order.email_invalid",
            ),
            OrderError::AddressEmpty => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "order.address_empty",
            ),
            OrderError::CityEmpty => {
                (StatusCode::BAD_REQUEST, "ValidationError", "order.city_empty")
            }
            OrderError::PhoneEmpty => {
                (StatusCode::BAD_REQUEST, "ValidationError", "order.phone_empty")
            }
            OrderError::CheckoutInProgress => (
                StatusCode::CONFLICT,
                "CheckoutInProgress",
                "order.checkout_in_progress",
            ),
            OrderError::SubmissionFailed => (
                StatusCode::BAD_GATEWAY,
                "SubmissionFailed",
                "order.submission_failed",
            ),
        };

        (
            status,
            Json(ErrorResponse {
                name: name.to_string(),
                message: message.to_string(),
            }),
        )
    }
}
