#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("order.empty_cart")]
    EmptyCart,
    #[error("order.customer_name_empty")]
    CustomerNameEmpty,
    #[error("order.email_invalid")]
    EmailInvalid,
    #[error("order.address_empty")]
    AddressEmpty,
    #[error("order.city_empty")]
    CityEmpty,
    #[error("order.phone_empty")]
    PhoneEmpty,
    #[error("order.checkout_in_progress")]
    CheckoutInProgress,
    #[error("order.submission_failed")]
    SubmissionFailed,
}
