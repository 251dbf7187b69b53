//! The shopper's cart.

use std::sync::Arc;

use anugadget_common::cart::CartLine;
use anugadget_common::product::{Product, ProductId};
use chrono::Utc;
use tracing::debug;

use crate::kv::{decode_list, encode, KvStore, StoreError};

/// Storage key owned by the cart store.
pub const CART_KEY: &str = "anugadget_cart_v1";

/// A cart line resolved against a catalog snapshot. Resolution happens at
/// read time; a line whose product has left the catalog resolves to `None`.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    pub line: CartLine,
    pub product: Option<Product>,
}

/// Ordered cart lines with a persisted mirror. Every mutation writes the
/// full list back before updating the in-memory copy.
pub struct CartStore {
    kv: Arc<dyn KvStore>,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Load the persisted cart. Malformed stored data is an empty cart.
    pub fn load(kv: Arc<dyn KvStore>) -> Self {
        let lines = decode_list(kv.get(CART_KEY));
        CartStore { kv, lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` (clamped to at least 1) of a product. Re-adding an
    /// item increments its existing line, so the cart never holds two lines
    /// for the same product.
    pub fn add(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), StoreError> {
        let qty = quantity.max(1);
        let mut next = self.lines.clone();
        if let Some(line) = next.iter_mut().find(|l| l.product_id == *product_id) {
            line.quantity += qty;
        } else {
            next.push(CartLine {
                id: fresh_line_id(product_id),
                product_id: product_id.clone(),
                quantity: qty,
            });
        }
        debug!(%product_id, qty, "add to cart");
        self.persist(next)
    }

    /// Replace a line's quantity, clamped to at least 0. A line at 0 is
    /// dropped, not retained.
    pub fn update_quantity(&mut self, line_id: &str, quantity: i64) -> Result<(), StoreError> {
        let next = self
            .lines
            .iter()
            .cloned()
            .map(|mut line| {
                if line.id == line_id {
                    line.quantity = quantity.max(0) as u32;
                }
                line
            })
            .filter(|line| line.quantity > 0)
            .collect();
        self.persist(next)
    }

    /// Drop a line. No-op when absent.
    pub fn remove(&mut self, line_id: &str) -> Result<(), StoreError> {
        let next = self
            .lines
            .iter()
            .filter(|line| line.id != line_id)
            .cloned()
            .collect();
        self.persist(next)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.persist(Vec::new())
    }

    /// Resolve every line against a catalog snapshot, in cart order.
    pub fn resolved(&self, catalog: &[Product]) -> Vec<ResolvedLine> {
        self.lines
            .iter()
            .map(|line| ResolvedLine {
                line: line.clone(),
                product: catalog.iter().find(|p| p.id == line.product_id).cloned(),
            })
            .collect()
    }

    /// Σ price × quantity over all lines. A line whose product cannot be
    /// resolved contributes 0 rather than failing the computation.
    pub fn subtotal(&self, catalog: &[Product]) -> u64 {
        self.lines
            .iter()
            .map(|line| {
                let price = catalog
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map_or(0, |p| p.price);
                price * u64::from(line.quantity)
            })
            .sum()
    }

    /// Σ quantity over all lines, for the cart badge.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    fn persist(&mut self, next: Vec<CartLine>) -> Result<(), StoreError> {
        self.kv.set(CART_KEY, &encode(&next))?;
        self.lines = next;
        Ok(())
    }
}

fn fresh_line_id(product_id: &ProductId) -> String {
    format!("{}-{}", product_id.0, Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;
    use anugadget_common::builtin;

    fn store() -> (Arc<dyn KvStore>, CartStore) {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
        let cart = CartStore::load(kv.clone());
        (kv, cart)
    }

    fn pid(s: &str) -> ProductId {
        ProductId::from(s)
    }

    #[test]
    fn re_adding_merges_into_one_line() {
        let (_kv, mut cart) = store();
        cart.add(&pid("airpods-pro-2"), 1).unwrap();
        cart.add(&pid("airpods-pro-2"), 2).unwrap();
        // Zero clamps to one
        cart.add(&pid("airpods-pro-2"), 0).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn distinct_products_get_distinct_lines() {
        let (_kv, mut cart) = store();
        cart.add(&pid("airpods-pro-2"), 1).unwrap();
        cart.add(&pid("macbook-pro-m3"), 1).unwrap();
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn quantity_zero_or_negative_removes_the_line() {
        let (_kv, mut cart) = store();
        cart.add(&pid("airpods-pro-2"), 2).unwrap();
        let line_id = cart.lines()[0].id.clone();

        cart.update_quantity(&line_id, 0).unwrap();
        assert!(cart.is_empty());

        cart.add(&pid("airpods-pro-2"), 2).unwrap();
        let line_id = cart.lines()[0].id.clone();
        cart.update_quantity(&line_id, -5).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_replaces() {
        let (_kv, mut cart) = store();
        cart.add(&pid("airpods-pro-2"), 2).unwrap();
        let line_id = cart.lines()[0].id.clone();
        cart.update_quantity(&line_id, 7).unwrap();
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn remove_is_a_noop_for_unknown_lines() {
        let (_kv, mut cart) = store();
        cart.add(&pid("airpods-pro-2"), 1).unwrap();
        cart.remove("no-such-line").unwrap();
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn subtotal_treats_unresolvable_items_as_zero() {
        let catalog = builtin::products();
        let (_kv, mut cart) = store();
        cart.add(&pid("airpods-pro-2"), 2).unwrap(); // 250,000 each
        cart.add(&pid("gone-from-catalog"), 3).unwrap();

        assert_eq!(cart.subtotal(&catalog), 500_000);
        assert_eq!(cart.item_count(), 5);

        let resolved = cart.resolved(&catalog);
        assert!(resolved[0].product.is_some());
        assert!(resolved[1].product.is_none());
    }

    #[test]
    fn cart_survives_reload() {
        let (kv, mut cart) = store();
        cart.add(&pid("macbook-pro-m3"), 1).unwrap();
        drop(cart);

        let cart = CartStore::load(kv);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].product_id, pid("macbook-pro-m3"));
    }

    #[test]
    fn malformed_stored_cart_is_empty() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
        kv.set(CART_KEY, r#"{"not":"a list"}"#).unwrap();
        let cart = CartStore::load(kv);
        assert!(cart.is_empty());
    }

    #[test]
    fn clear_empties_the_cart() {
        let (kv, mut cart) = store();
        cart.add(&pid("airpods-pro-2"), 1).unwrap();
        cart.clear().unwrap();
        assert!(cart.is_empty());
        assert_eq!(kv.get(CART_KEY).as_deref(), Some("[]"));
    }
}
