use std::sync::Arc;

use logger::TracingLogger;
use orders::client::OrdersClient;
use orders::order_gateway::OrderGatewayHttp;
use persistence::file_storage::FileStorage;
use persistence::memory_storage::MemoryStorage;

use business::application::cart::store::CartStore;
use business::application::order::place_order::PlaceOrderUseCaseImpl;
use business::domain::cart::storage::KeyValueStorage;

use crate::api::cart::badge::BadgeCounter;
use crate::config::{orders_config::OrdersConfig, storage_config::{StorageBackend, StorageConfig}};

pub struct DependencyContainer {
    pub health_api: crate::api::health::routes::HealthApi,
    pub cart_api: crate::api::cart::routes::CartApi,
    pub checkout_api: crate::api::checkout::routes::CheckoutApi,
}

impl DependencyContainer {
    pub fn new(storage_config: &StorageConfig, orders_config: &OrdersConfig) -> Self {
        let logger = Arc::new(TracingLogger);
        let health_api = crate::api::health::routes::HealthApi::new();

        // Infrastructure adapters
        let storage: Arc<dyn KeyValueStorage> = match storage_config.backend {
            StorageBackend::File => Arc::new(FileStorage::new(storage_config.dir.clone())),
            StorageBackend::Memory => match storage_config.quota {
                Some(quota) => Arc::new(MemoryStorage::with_quota(quota)),
                None => Arc::new(MemoryStorage::new()),
            },
        };
        let order_gateway = Arc::new(OrderGatewayHttp::new(OrdersClient::new(
            orders_config.base_url.clone(),
        )));

        // Cart store, restored from the persisted mirror
        let cart_store = Arc::new(CartStore::with_key(
            storage,
            logger.clone(),
            storage_config.key.clone(),
        ));
        let badge = Arc::new(BadgeCounter::new(&cart_store.summary()));
        cart_store.subscribe(badge.clone());

        // Checkout use cases
        let place_order_use_case = Arc::new(PlaceOrderUseCaseImpl::new(
            cart_store.clone(),
            order_gateway,
            logger,
        ));

        let cart_api = crate::api::cart::routes::CartApi::new(cart_store, badge);
        let checkout_api = crate::api::checkout::routes::CheckoutApi::new(place_order_use_case);

        Self {
            health_api,
            cart_api,
            checkout_api,
        }
    }
}
