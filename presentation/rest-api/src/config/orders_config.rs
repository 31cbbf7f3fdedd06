use std::env;

/// Configuration for the external order API.
#[derive(Debug, Clone)]
pub struct OrdersConfig {
    pub base_url: String,
}

impl OrdersConfig {
    /// Environment variables:
    /// - ORDERS_API_URL: Base URL of the order API (default: "http://localhost:5000")
    pub fn from_env() -> Self {
        let base_url =
            env::var("ORDERS_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
        Self { base_url }
    }
}
