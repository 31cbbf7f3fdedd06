use dotenvy::dotenv;

mod api;
mod config;
mod setup;

use config::app_config::AppConfig;
use setup::{dependency_injection::DependencyContainer, server::Server};

/// Storefront cart service entry point
///
/// Restores the cart from its persisted mirror, wires the order API adapter
/// and serves the cart and checkout endpoints.
/// - config/: Application configuration (server, CORS, storage, order API)
/// - setup/: Dependency injection and server setup
/// - api/: Route handlers and DTOs
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Initialize tracing with RUST_LOG env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // 3. Load configuration
    let config = AppConfig::from_env();
    tracing::info!(
        backend = ?config.storage.backend,
        storage = %config.storage.document_path().display(),
        orders_api = %config.orders.base_url,
        "Configuration loaded"
    );

    // 4. Wire dependencies
    let container = DependencyContainer::new(&config.storage, &config.orders);

    // 5. Run server
    Server::run(config.server, config.cors, container).await?;

    Ok(())
}
