use std::sync::{Mutex, PoisonError};

use business::domain::cart::listener::CartListener;
use business::domain::cart::model::CartSummary;

/// Navigation badge count, kept current by cart change notifications.
///
/// Notifications from concurrent mutations can arrive out of order, so a
/// summary older than the one already shown is ignored.
pub struct BadgeCounter {
    latest: Mutex<(u64, u64)>,
}

impl BadgeCounter {
    /// Starts from the store's current summary.
    pub fn new(initial: &CartSummary) -> Self {
        Self {
            latest: Mutex::new((initial.revision, initial.item_count)),
        }
    }

    pub fn count(&self) -> u64 {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).1
    }
}

impl CartListener for BadgeCounter {
    fn on_cart_changed(&self, summary: &CartSummary) {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if summary.revision < latest.0 {
            tracing::debug!(
                revision = summary.revision,
                shown = latest.0,
                "Ignoring stale cart summary"
            );
            return;
        }
        *latest = (summary.revision, summary.item_count);
        tracing::debug!(count = summary.item_count, "Cart badge updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn summary(revision: u64, item_count: u64) -> CartSummary {
        CartSummary {
            revision,
            line_count: 1,
            item_count,
            total: Decimal::from(item_count),
        }
    }

    #[test]
    fn should_track_latest_item_count() {
        let badge = BadgeCounter::new(&summary(0, 2));

        badge.on_cart_changed(&summary(1, 5));

        assert_eq!(badge.count(), 5);
    }

    #[test]
    fn should_ignore_summary_delivered_after_newer_one() {
        let badge = BadgeCounter::new(&summary(0, 0));

        badge.on_cart_changed(&summary(2, 2));
        badge.on_cart_changed(&summary(1, 1));

        assert_eq!(badge.count(), 2);
    }
}
