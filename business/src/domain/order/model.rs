use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use super::errors::OrderError;
use crate::domain::cart::model::LineItem;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Contact and delivery details collected at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub phone1: String,
    pub phone2: Option<String>,
}

impl CustomerDetails {
    pub fn new(
        name: String,
        email: String,
        address: String,
        city: String,
        phone1: String,
        phone2: Option<String>,
    ) -> Result<Self, OrderError> {
        if name.trim().is_empty() {
            return Err(OrderError::CustomerNameEmpty);
        }
        let email_valid = Regex::new(EMAIL_PATTERN)
            .map(|re| re.is_match(email.trim()))
            .unwrap_or(false);
        if !email_valid {
            return Err(OrderError::EmailInvalid);
        }
        if address.trim().is_empty() {
            return Err(OrderError::AddressEmpty);
        }
        if city.trim().is_empty() {
            return Err(OrderError::CityEmpty);
        }
        if phone1.trim().is_empty() {
            return Err(OrderError::PhoneEmpty);
        }

        Ok(Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            address: address.trim().to_string(),
            city: city.trim().to_string(),
            phone1: phone1.trim().to_string(),
            phone2: phone2
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        })
    }

    pub fn shipping_address(&self) -> String {
        format!("{}, {}", self.address, self.city)
    }
}

/// Payload recorded by the order API for a single line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
    pub customer_name: String,
    pub phone1: String,
    pub phone2: String,
    pub address: String,
}

impl OrderLine {
    pub fn for_item(item: &LineItem, customer: &CustomerDetails) -> Self {
        Self {
            product_id: item.id.clone(),
            quantity: item.quantity,
            customer_name: customer.name.clone(),
            phone1: customer.phone1.clone(),
            phone2: customer.phone2.clone().unwrap_or_default(),
            address: customer.shipping_address(),
        }
    }
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub orders_placed: usize,
    pub item_count: u64,
    pub total: Decimal,
}
