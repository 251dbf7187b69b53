//! Saved items. Mirrors the cart's persistence pattern without quantities.

use std::sync::Arc;

use anugadget_common::product::{Product, ProductId};
use anugadget_common::wishlist::WishlistEntry;
use chrono::Utc;

use crate::kv::{decode_list, encode, KvStore, StoreError};

/// Storage key owned by the wishlist store.
pub const WISHLIST_KEY: &str = "anugadget_wishlist_v1";

pub struct WishlistStore {
    kv: Arc<dyn KvStore>,
    entries: Vec<WishlistEntry>,
}

impl WishlistStore {
    /// Load the persisted wishlist. Malformed stored data is an empty list.
    pub fn load(kv: Arc<dyn KvStore>) -> Self {
        let entries = decode_list(kv.get(WISHLIST_KEY));
        WishlistStore { kv, entries }
    }

    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Save a product. Idempotent: a product already on the list is left
    /// untouched.
    pub fn add(&mut self, product_id: &ProductId) -> Result<(), StoreError> {
        if self.contains(product_id) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.push(WishlistEntry {
            id: format!("{}-{}", product_id.0, Utc::now().timestamp_millis()),
            product_id: product_id.clone(),
        });
        self.persist(next)
    }

    /// Drop an entry by its entry id (not the product id).
    pub fn remove(&mut self, entry_id: &str) -> Result<(), StoreError> {
        let next = self
            .entries
            .iter()
            .filter(|e| e.id != entry_id)
            .cloned()
            .collect();
        self.persist(next)
    }

    /// Membership test by product identifier.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.iter().any(|e| e.product_id == *product_id)
    }

    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    /// Resolve entries against a catalog snapshot; products no longer in
    /// the catalog resolve to `None`.
    pub fn resolved(&self, catalog: &[Product]) -> Vec<(WishlistEntry, Option<Product>)> {
        self.entries
            .iter()
            .map(|entry| {
                let product = catalog.iter().find(|p| p.id == entry.product_id).cloned();
                (entry.clone(), product)
            })
            .collect()
    }

    fn persist(&mut self, next: Vec<WishlistEntry>) -> Result<(), StoreError> {
        self.kv.set(WISHLIST_KEY, &encode(&next))?;
        self.entries = next;
        Ok(())
    }
}
