use super::model::CartSummary;

/// Observer notified after every applied cart mutation.
///
/// Invoked synchronously on the mutating thread, once the persisted mirror
/// write has been attempted and the cart lock released.
pub trait CartListener: Send + Sync {
    fn on_cart_changed(&self, summary: &CartSummary);
}
