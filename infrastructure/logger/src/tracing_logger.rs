use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

/// Forwards business-layer log lines to `tracing`.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "Storefront -- ", "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: "Storefront -- ", "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: "Storefront -- ", "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: "Storefront -- ", "{}", message);
    }
}
