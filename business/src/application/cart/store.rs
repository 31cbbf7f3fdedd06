use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use rust_decimal::Decimal;

use crate::domain::cart::listener::CartListener;
use crate::domain::cart::model::{Cart, CartSummary, LineItem, ProductSnapshot};
use crate::domain::cart::storage::KeyValueStorage;
use crate::domain::logger::Logger;

pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Authoritative in-session cart with a persisted mirror.
///
/// Every applied mutation is written to storage before the call returns and
/// then announced to subscribed listeners. Storage failures are logged and
/// swallowed: the in-memory cart stays authoritative for the session.
///
/// Each applied mutation bumps the revision carried by [`CartSummary`].
/// Notifications from concurrent mutations may reach a listener out of order;
/// the revision lets it keep the newest.
pub struct CartStore {
    cart: Mutex<Cart>,
    revision: AtomicU64,
    listeners: RwLock<Vec<(SubscriptionId, Arc<dyn CartListener>)>>,
    next_subscription: AtomicU64,
    storage: Arc<dyn KeyValueStorage>,
    logger: Arc<dyn Logger>,
    key: String,
}

impl CartStore {
    /// Builds the store under the default `"cart"` key and restores any persisted cart.
    pub fn initialize(storage: Arc<dyn KeyValueStorage>, logger: Arc<dyn Logger>) -> Self {
        Self::with_key(storage, logger, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(
        storage: Arc<dyn KeyValueStorage>,
        logger: Arc<dyn Logger>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let cart = Self::restore(storage.as_ref(), logger.as_ref(), &key);

        Self {
            cart: Mutex::new(cart),
            revision: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            storage,
            logger,
            key,
        }
    }

    /// Adds one unit of `product` and returns the resulting line item.
    pub fn add_item(&self, product: ProductSnapshot) -> LineItem {
        self.logger
            .info(&format!("Adding product to cart: {}", product.id));
        self.mutate(|cart| (true, cart.add(product).clone()))
    }

    /// Returns whether a line item was removed.
    pub fn remove_item(&self, id: &str) -> bool {
        self.logger.info(&format!("Removing product from cart: {}", id));
        self.mutate(|cart| {
            let removed = cart.remove(id);
            (removed, removed)
        })
    }

    /// Sets the quantity of `id`; anything below one removes the line.
    /// Returns whether `id` was in the cart.
    pub fn set_quantity(&self, id: &str, quantity: i64) -> bool {
        self.logger
            .info(&format!("Setting quantity of {} to {}", id, quantity));
        self.mutate(|cart| {
            let applied = cart.set_quantity(id, quantity);
            (applied, applied)
        })
    }

    /// Moves the quantity of `id` by `delta`; a result below one removes the line.
    /// Returns whether `id` was in the cart.
    pub fn adjust_quantity(&self, id: &str, delta: i64) -> bool {
        self.logger
            .info(&format!("Adjusting quantity of {} by {}", id, delta));
        self.mutate(|cart| {
            let applied = cart.adjust_quantity(id, delta);
            (applied, applied)
        })
    }

    /// Takes the units of a placed order out of the cart, leaving anything
    /// added since the order was taken. Returns whether the cart changed.
    pub fn remove_ordered(&self, ordered: &[LineItem]) -> bool {
        self.logger
            .info(&format!("Removing {} ordered lines from cart", ordered.len()));
        self.mutate(|cart| {
            let changed = cart.remove_ordered(ordered);
            (changed, changed)
        })
    }

    /// Empties the cart and persists the empty state.
    pub fn clear(&self) {
        self.logger.info("Clearing cart");
        self.mutate(|cart| {
            cart.clear();
            (true, ())
        })
    }

    pub fn item_count(&self) -> u64 {
        self.lock_cart().item_count()
    }

    pub fn total(&self) -> Decimal {
        self.lock_cart().total()
    }

    pub fn list(&self) -> Vec<LineItem> {
        self.lock_cart().items().to_vec()
    }

    pub fn summary(&self) -> CartSummary {
        let cart = self.lock_cart();
        CartSummary {
            revision: self.revision.load(Ordering::Acquire),
            ..cart.summary()
        }
    }

    /// Consistent copy of the whole cart, for callers that need items and totals together.
    pub fn snapshot(&self) -> Cart {
        self.lock_cart().clone()
    }

    pub fn subscribe(&self, listener: Arc<dyn CartListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        self.logger.debug(&format!("Cart listener subscribed: {:?}", id));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(subscription, _)| *subscription != id);
        listeners.len() != before
    }

    fn restore(storage: &dyn KeyValueStorage, logger: &dyn Logger, key: &str) -> Cart {
        match storage.get(key) {
            Ok(Some(payload)) => match Cart::from_json(&payload) {
                Ok(cart) => {
                    logger.info(&format!("Restored cart with {} line items", cart.len()));
                    cart
                }
                Err(err) => {
                    logger.warn(&format!(
                        "Discarding unreadable cart under '{}': {}",
                        key, err
                    ));
                    if let Err(err) = storage.remove(key) {
                        logger.warn(&format!(
                            "Failed to remove unreadable cart under '{}': {}",
                            key, err
                        ));
                    }
                    Cart::new()
                }
            },
            Ok(None) => {
                logger.debug(&format!("No persisted cart under '{}'", key));
                Cart::new()
            }
            Err(err) => {
                logger.warn(&format!("Failed to load cart under '{}': {}", key, err));
                Cart::new()
            }
        }
    }

    /// Runs `apply` under the cart lock. When it reports the mutation as applied,
    /// the cart is persisted and its summary stamped with the next revision
    /// before the lock is released; listeners are notified afterwards.
    fn mutate<T>(&self, apply: impl FnOnce(&mut Cart) -> (bool, T)) -> T {
        let (output, summary) = {
            let mut cart = self.lock_cart();
            let (applied, output) = apply(&mut cart);
            if !applied {
                self.logger.debug("Cart mutation had no target, skipping persist");
                return output;
            }
            self.persist(&cart);
            let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
            (output, CartSummary {
                revision,
                ..cart.summary()
            })
        };

        self.notify(&summary);
        output
    }

    fn persist(&self, cart: &Cart) {
        let payload = match cart.to_json() {
            Ok(payload) => payload,
            Err(err) => {
                self.logger
                    .warn(&format!("Failed to serialize cart: {}", err));
                return;
            }
        };

        if let Err(err) = self.storage.set(&self.key, &payload) {
            self.logger.warn(&format!(
                "Failed to persist cart under '{}': {}",
                self.key, err
            ));
        }
    }

    fn notify(&self, summary: &CartSummary) {
        let listeners: Vec<Arc<dyn CartListener>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener.on_cart_changed(summary);
        }
    }

    fn lock_cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::StorageError;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        pub Storage {}

        impl KeyValueStorage for Storage {
            fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
            fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
            fn remove(&self, key: &str) -> Result<(), StorageError>;
        }
    }

    mock! {
        pub Log {}

        impl Logger for Log {
            fn info(&self, message: &str);
            fn warn(&self, message: &str);
            fn error(&self, message: &str);
            fn debug(&self, message: &str);
        }
    }

    mock! {
        pub Listener {}

        impl CartListener for Listener {
            fn on_cart_changed(&self, summary: &CartSummary);
        }
    }

    fn mock_logger() -> Arc<dyn Logger> {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_warn().returning(|_| ());
        logger.expect_error().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        Arc::new(logger)
    }

    type Shelf = Arc<Mutex<HashMap<String, String>>>;

    /// Storage mock backed by a shared map so tests can inspect the mirror.
    fn shelf_storage(shelf: Shelf) -> Arc<dyn KeyValueStorage> {
        let mut storage = MockStorage::new();
        let reader = shelf.clone();
        storage
            .expect_get()
            .returning(move |key| Ok(reader.lock().unwrap().get(key).cloned()));
        let writer = shelf.clone();
        storage.expect_set().returning(move |key, value| {
            writer
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        });
        storage.expect_remove().returning(move |key| {
            shelf.lock().unwrap().remove(key);
            Ok(())
        });
        Arc::new(storage)
    }

    fn empty_store() -> (CartStore, Shelf) {
        let shelf: Shelf = Arc::new(Mutex::new(HashMap::new()));
        let store = CartStore::initialize(shelf_storage(shelf.clone()), mock_logger());
        (store, shelf)
    }

    fn persisted(shelf: &Shelf) -> Option<String> {
        shelf.lock().unwrap().get(DEFAULT_STORAGE_KEY).cloned()
    }

    fn pan() -> ProductSnapshot {
        ProductSnapshot::new("a")
            .with_title("Pan")
            .with_sale_price(Decimal::from(20))
    }

    fn pot() -> ProductSnapshot {
        ProductSnapshot::new("b")
            .with_title("Pot")
            .with_sale_price(Decimal::from(35))
    }

    #[test]
    fn should_start_empty_when_nothing_persisted() {
        let (store, shelf) = empty_store();

        assert!(store.list().is_empty());
        assert_eq!(store.item_count(), 0);
        assert!(persisted(&shelf).is_none());
    }

    #[test]
    fn should_restore_persisted_cart() {
        let shelf: Shelf = Arc::new(Mutex::new(HashMap::new()));
        shelf.lock().unwrap().insert(
            DEFAULT_STORAGE_KEY.to_string(),
            r#"[{"id":"a","title":"Pan","category":"Cookware","image":"pan.jpg","oldPrice":25,"salePrice":20,"quantity":2}]"#
                .to_string(),
        );

        let store = CartStore::initialize(shelf_storage(shelf), mock_logger());

        let items = store.list();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Pan");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(store.total(), Decimal::from(40));
    }

    #[test]
    fn should_fail_open_when_persisted_cart_malformed() {
        let shelf: Shelf = Arc::new(Mutex::new(HashMap::new()));
        shelf
            .lock()
            .unwrap()
            .insert(DEFAULT_STORAGE_KEY.to_string(), "{not json".to_string());

        let store = CartStore::initialize(shelf_storage(shelf.clone()), mock_logger());

        assert!(store.list().is_empty());
        assert!(persisted(&shelf).is_none());
    }

    #[test]
    fn should_fail_open_when_storage_unreadable() {
        let mut storage = MockStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(StorageError::Unavailable));

        let store = CartStore::initialize(Arc::new(storage), mock_logger());

        assert!(store.list().is_empty());
    }

    #[test]
    fn should_persist_after_each_mutation() {
        let (store, shelf) = empty_store();

        store.add_item(pan());
        assert_eq!(
            persisted(&shelf).as_deref(),
            Some(r#"[{"id":"a","title":"Pan","category":"Uncategorized","image":"","oldPrice":0,"salePrice":20,"quantity":1}]"#)
        );

        store.set_quantity("a", 4);
        assert!(persisted(&shelf).unwrap().contains(r#""quantity":4"#));

        store.clear();
        assert_eq!(persisted(&shelf).as_deref(), Some("[]"));
    }

    #[test]
    fn should_merge_scenario_from_storefront() {
        let (store, _shelf) = empty_store();

        store.add_item(pan());
        store.add_item(pot());
        let merged = store.add_item(ProductSnapshot::new("a").with_title("Other"));

        assert_eq!(merged.quantity, 2);
        assert_eq!(merged.title, "Pan");
        let items = store.list();
        assert_eq!(items.len(), 2);
        assert_eq!((items[0].id.as_str(), items[0].quantity), ("a", 2));
        assert_eq!((items[1].id.as_str(), items[1].quantity), ("b", 1));
        assert_eq!(store.total(), Decimal::from(75));
        assert_eq!(store.item_count(), 3);
    }

    #[test]
    fn should_round_trip_through_storage() {
        let (store, shelf) = empty_store();
        store.add_item(pan());
        store.add_item(pot());
        store.adjust_quantity("b", 2);

        let reloaded = CartStore::initialize(shelf_storage(shelf), mock_logger());

        assert_eq!(reloaded.snapshot(), store.snapshot());
    }

    #[test]
    fn should_treat_unknown_id_as_noop() {
        let mut storage = MockStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage.expect_set().times(0);
        let store = CartStore::initialize(Arc::new(storage), mock_logger());

        assert!(!store.remove_item("z"));
        assert!(!store.set_quantity("z", 2));
        assert!(!store.adjust_quantity("z", 1));
        assert!(store.list().is_empty());
    }

    #[test]
    fn should_remove_when_adjusted_below_one() {
        let (store, _shelf) = empty_store();
        store.add_item(pan());

        assert!(store.adjust_quantity("a", -1));

        assert!(store.list().is_empty());
    }

    #[test]
    fn should_keep_memory_state_when_persist_fails() {
        let mut storage = MockStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .returning(|_, _| Err(StorageError::QuotaExceeded));
        let store = CartStore::initialize(Arc::new(storage), mock_logger());

        store.add_item(pan());
        store.add_item(pan());

        assert_eq!(store.item_count(), 2);
        assert_eq!(store.total(), Decimal::from(40));
    }

    #[test]
    fn should_notify_listeners_after_mutation() {
        let (store, _shelf) = empty_store();
        let mut listener = MockListener::new();
        listener
            .expect_on_cart_changed()
            .withf(|summary| summary.item_count == 1 && summary.total == Decimal::from(20))
            .times(1)
            .returning(|_| ());
        store.subscribe(Arc::new(listener));

        store.add_item(pan());
    }

    #[test]
    fn should_not_notify_on_noop() {
        let (store, _shelf) = empty_store();
        let mut listener = MockListener::new();
        listener.expect_on_cart_changed().times(0);
        store.subscribe(Arc::new(listener));

        store.remove_item("z");
    }

    #[test]
    fn should_stop_notifying_after_unsubscribe() {
        let (store, _shelf) = empty_store();
        let mut listener = MockListener::new();
        listener.expect_on_cart_changed().times(1).returning(|_| ());
        let id = store.subscribe(Arc::new(listener));

        store.add_item(pan());
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add_item(pot());
    }

    #[test]
    fn should_clear_items_and_counts() {
        let (store, _shelf) = empty_store();
        store.add_item(pan());
        store.add_item(pot());

        store.clear();

        assert!(store.list().is_empty());
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.total(), Decimal::ZERO);
    }

    #[test]
    fn should_use_custom_storage_key() {
        let shelf: Shelf = Arc::new(Mutex::new(HashMap::new()));
        let store = CartStore::with_key(shelf_storage(shelf.clone()), mock_logger(), "guest-cart");

        store.add_item(pan());

        let stored = shelf.lock().unwrap();
        assert!(stored.contains_key("guest-cart"));
        assert!(!stored.contains_key(DEFAULT_STORAGE_KEY));
    }

    #[test]
    fn should_keep_units_added_after_order_was_taken() {
        let (store, shelf) = empty_store();
        store.add_item(pan());
        store.add_item(pot());
        let ordered = store.list();
        store.add_item(pot());
        store.add_item(ProductSnapshot::new("late"));

        assert!(store.remove_ordered(&ordered));

        let items = store.list();
        assert_eq!(items.len(), 2);
        assert_eq!((items[0].id.as_str(), items[0].quantity), ("b", 1));
        assert_eq!((items[1].id.as_str(), items[1].quantity), ("late", 1));
        assert!(!persisted(&shelf).unwrap().contains(r#""id":"a""#));
    }

    #[test]
    fn should_stamp_increasing_revisions() {
        let (store, _shelf) = empty_store();
        assert_eq!(store.summary().revision, 0);

        store.add_item(pan());
        store.remove_item("z");
        store.add_item(pot());

        let summary = store.summary();
        assert_eq!(summary.revision, 2);
        assert_eq!(summary.item_count, 2);
    }

    struct Recorder {
        seen: Mutex<Vec<CartSummary>>,
    }

    impl CartListener for Recorder {
        fn on_cart_changed(&self, summary: &CartSummary) {
            self.seen.lock().unwrap().push(*summary);
        }
    }

    #[test]
    fn should_let_listeners_identify_newest_summary_under_concurrency() {
        let (store, _shelf) = empty_store();
        let store = Arc::new(store);
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        store.subscribe(recorder.clone());

        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for n in 0..25 {
                        store.add_item(ProductSnapshot::new(format!("{}-{}", worker, n)));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 100);
        let newest = seen.iter().max_by_key(|summary| summary.revision).unwrap();
        assert_eq!(newest.revision, 100);
        assert_eq!(newest.item_count, store.item_count());
        for summary in seen.iter() {
            assert_eq!(summary.item_count, summary.revision);
        }
    }
}
