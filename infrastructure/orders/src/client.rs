use reqwest::Client;

/// Shared HTTP client for the storefront's order API.
pub struct OrdersClient {
    pub client: Client,
    pub base_url: String,
}

impl OrdersClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the order creation endpoint URL.
    pub fn orders_url(&self) -> String {
        format!("{}/api/orders", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_orders_url() {
        let client = OrdersClient::new("http://localhost:5000");

        assert_eq!(client.orders_url(), "http://localhost:5000/api/orders");
    }

    #[test]
    fn should_strip_trailing_slash_from_base_url() {
        let client = OrdersClient::new("https://shop.example.com/");

        assert_eq!(client.orders_url(), "https://shop.example.com/api/orders");
    }
}
