use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::CartError;
use super::money;

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Catalog product as handed to the cart when the shopper adds it.
///
/// Only `id` is required; absent fields fall back to the line item defaults.
#[derive(Debug, Clone, Default)]
pub struct ProductSnapshot {
    pub id: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub old_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
}

impl ProductSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_old_price(mut self, price: Decimal) -> Self {
        self.old_price = Some(price);
        self
    }

    pub fn with_sale_price(mut self, price: Decimal) -> Self {
        self.sale_price = Some(price);
        self
    }
}

/// One product's presence in the cart.
///
/// Display fields and prices are frozen when the product is first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, with = "money")]
    pub old_price: Decimal,
    #[serde(default, with = "money")]
    pub sale_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub fn from_snapshot(product: ProductSnapshot) -> Self {
        Self {
            id: product.id,
            title: product.title.unwrap_or_default(),
            category: product
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(default_category),
            image: product.image.unwrap_or_default(),
            old_price: product.old_price.unwrap_or_default(),
            sale_price: product.sale_price.unwrap_or_default(),
            quantity: 1,
        }
    }

    /// `sale_price × quantity`.
    pub fn subtotal(&self) -> Decimal {
        self.sale_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Derived aggregates handed to listeners and renderers.
///
/// `revision` orders summaries of the same cart: a store stamps each applied
/// mutation with a higher value, so a listener can drop a summary that arrives
/// after a newer one. A bare [`Cart`] reports revision zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub revision: u64,
    pub line_count: usize,
    pub item_count: u64,
    pub total: Decimal,
}

/// Ordered, id-unique collection of line items.
///
/// Every line item holds a quantity of at least one. Mutations report whether
/// they found their target so callers can skip persisting no-ops.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit of `product`.
    ///
    /// A repeat add only bumps the quantity; the fields captured on the first
    /// add are kept so the shopper pays the price they saw.
    pub fn add(&mut self, product: ProductSnapshot) -> &LineItem {
        let index = match self.position(&product.id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity = item.quantity.saturating_add(1);
                index
            }
            None => {
                self.items.push(LineItem::from_snapshot(product));
                self.items.len() - 1
            }
        };
        &self.items[index]
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Sets the quantity of `id`. Anything below one removes the line.
    ///
    /// Quantities are held as `u32`; larger requests saturate at `u32::MAX`.
    /// Callers taking quantities from outside reject those first.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> bool {
        if quantity < 1 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Moves the quantity of `id` by `delta`, removing the line once it drops below one.
    pub fn adjust_quantity(&mut self, id: &str, delta: i64) -> bool {
        match self.get(id) {
            Some(item) => {
                let target = i64::from(item.quantity).saturating_add(delta);
                self.set_quantity(id, target)
            }
            None => false,
        }
    }

    /// Takes ordered units out of the cart: each ordered line lowers the
    /// matching line by its quantity and removes it once nothing is left.
    /// Units added after the order was taken stay in the cart.
    pub fn remove_ordered(&mut self, ordered: &[LineItem]) -> bool {
        ordered.iter().fold(false, |changed, line| {
            self.adjust_quantity(&line.id, -i64::from(line.quantity)) || changed
        })
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.subtotal()))
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            revision: 0,
            line_count: self.items.len(),
            item_count: self.item_count(),
            total: self.total(),
        }
    }

    pub fn to_json(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Decodes a persisted cart, rejecting payloads that break the cart invariants.
    pub fn from_json(payload: &str) -> Result<Self, CartError> {
        let items: Vec<LineItem> = serde_json::from_str(payload)?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.quantity < 1 {
                return Err(CartError::InvalidQuantity(item.id.clone()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CartError::DuplicateItem(item.id.clone()));
            }
        }

        Ok(Self { items })
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}
