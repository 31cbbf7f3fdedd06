use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::application::cart::store::CartStore;
use crate::domain::logger::Logger;
use crate::domain::order::errors::OrderError;
use crate::domain::order::gateway::OrderGateway;
use crate::domain::order::model::{CheckoutReceipt, OrderLine};
use crate::domain::order::use_cases::place_order::{PlaceOrderParams, PlaceOrderUseCase};

/// Places one order per cart line.
///
/// Only one checkout runs at a time; a second call made while orders are in
/// flight fails with [`OrderError::CheckoutInProgress`] instead of submitting
/// the same lines again.
pub struct PlaceOrderUseCaseImpl {
    cart: Arc<CartStore>,
    gateway: Arc<dyn OrderGateway>,
    logger: Arc<dyn Logger>,
    in_flight: AtomicBool,
}

impl PlaceOrderUseCaseImpl {
    pub fn new(
        cart: Arc<CartStore>,
        gateway: Arc<dyn OrderGateway>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            cart,
            gateway,
            logger,
            in_flight: AtomicBool::new(false),
        }
    }
}

/// Marks a checkout as running until dropped, including when the checkout
/// future is cancelled mid-flight.
struct CheckoutGuard<'a>(&'a AtomicBool);

impl<'a> CheckoutGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for CheckoutGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[async_trait]
impl PlaceOrderUseCase for PlaceOrderUseCaseImpl {
    async fn execute(&self, params: PlaceOrderParams) -> Result<CheckoutReceipt, OrderError> {
        let Some(_guard) = CheckoutGuard::acquire(&self.in_flight) else {
            self.logger
                .warn("Checkout rejected, another checkout is in progress");
            return Err(OrderError::CheckoutInProgress);
        };

        let cart = self.cart.snapshot();
        if cart.is_empty() {
            self.logger.warn("Checkout attempted with an empty cart");
            return Err(OrderError::EmptyCart);
        }

        self.logger.info(&format!(
            "Placing {} orders for {}",
            cart.len(),
            params.customer.name
        ));

        // One order per line item, submitted together.
        let lines: Vec<OrderLine> = cart
            .items()
            .iter()
            .map(|item| OrderLine::for_item(item, &params.customer))
            .collect();

        if let Err(err) = try_join_all(lines.iter().map(|line| self.gateway.submit(line))).await {
            self.logger
                .error(&format!("Order submission failed, keeping cart: {}", err));
            return Err(err);
        }

        // The cart may have changed while orders were in flight.
        self.cart.remove_ordered(cart.items());

        let receipt = CheckoutReceipt {
            orders_placed: lines.len(),
            item_count: cart.item_count(),
            total: cart.total(),
        };
        self.logger.info(&format!(
            "Checkout complete: {} orders, total {}",
            receipt.orders_placed, receipt.total
        ));
        Ok(receipt)
    }
}
