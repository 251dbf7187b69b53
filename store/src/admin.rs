//! The mock admin surface: catalog-extension records and offline inventory
//! adjustments. Shopper-facing code sees these records only through the
//! catalog provider's unified mapping.

use std::collections::BTreeMap;
use std::sync::Arc;

use anugadget_common::admin::{AdminProduct, ProductStatus, PLACEHOLDER_IMAGE};
use chrono::Utc;
use tracing::{debug, info};

use crate::kv::{decode_list, encode, KvStore, StoreError};

/// Storage key owned by the admin catalog store.
pub const ADMIN_PRODUCTS_KEY: &str = "anugadget_admin_products_v1";

/// Raw form input for a new admin product, before validation and
/// normalization.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: u64,
    pub old_price: Option<u64>,
    pub stock: u32,
    /// Explicit image URL; preferred over uploads when non-blank.
    pub image_url: String,
    /// Uploaded images (data URLs in the original form).
    pub images: Vec<String>,
    /// Multi-line "Key: value" text, one specification per line.
    pub specifications: String,
    /// One feature per line.
    pub features: String,
}

pub struct AdminCatalogStore {
    kv: Arc<dyn KvStore>,
    products: Vec<AdminProduct>,
}

impl AdminCatalogStore {
    /// Load the persisted extension records. Malformed stored data is an
    /// empty list.
    pub fn load(kv: Arc<dyn KvStore>) -> Self {
        let products = decode_list(kv.get(ADMIN_PRODUCTS_KEY));
        AdminCatalogStore { kv, products }
    }

    pub fn products(&self) -> &[AdminProduct] {
        &self.products
    }

    pub fn find(&self, id: i64) -> Option<&AdminProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Validate and add a record, newest first. A blank name or zero price
    /// is rejected as a normal negative result, not an error.
    pub fn add(&mut self, input: NewProduct) -> Result<Option<i64>, StoreError> {
        if input.name.trim().is_empty() || input.price == 0 {
            debug!("rejecting admin product with blank name or zero price");
            return Ok(None);
        }

        let id = self.fresh_id();
        let image = {
            let url = input.image_url.trim();
            if !url.is_empty() {
                url.to_owned()
            } else if let Some(first) = input.images.first() {
                first.clone()
            } else {
                PLACEHOLDER_IMAGE.to_owned()
            }
        };
        let images = if input.images.is_empty() {
            vec![image.clone()]
        } else {
            input.images.clone()
        };
        let specifications = parse_specifications(&input.specifications);
        let features: Vec<String> = input
            .features
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect();

        let record = AdminProduct {
            id,
            name: input.name.trim().to_owned(),
            price: input.price,
            stock: input.stock,
            category: input.category,
            image_url: {
                let url = input.image_url.trim();
                (!url.is_empty()).then(|| url.to_owned())
            },
            image: Some(image),
            images,
            specifications: (!specifications.is_empty()).then_some(specifications),
            features: (!features.is_empty()).then_some(features),
            status: Some(ProductStatus::for_stock(input.stock)),
            old_price: input.old_price,
        };

        info!(id, name = %record.name, "admin product added");
        let mut next = self.products.clone();
        next.insert(0, record);
        self.persist(next)?;
        Ok(Some(id))
    }

    /// Replace a record wholesale, re-deriving its status from stock.
    /// Returns false when no record carries the id.
    pub fn update(&mut self, mut updated: AdminProduct) -> Result<bool, StoreError> {
        updated.status = Some(ProductStatus::for_stock(updated.stock));
        let mut next = self.products.clone();
        let Some(slot) = next.iter_mut().find(|p| p.id == updated.id) else {
            return Ok(false);
        };
        *slot = updated;
        self.persist(next)?;
        Ok(true)
    }

    /// Drop a record. Returns false when no record carries the id.
    pub fn remove(&mut self, id: i64) -> Result<bool, StoreError> {
        let next: Vec<AdminProduct> = self
            .products
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        if next.len() == self.products.len() {
            return Ok(false);
        }
        info!(id, "admin product removed");
        self.persist(next)?;
        Ok(true)
    }

    /// Record an offline sale: stock drops by `quantity`, floored at zero,
    /// and the status is re-derived. A zero quantity is ignored.
    pub fn record_sale(&mut self, id: i64, quantity: u32) -> Result<bool, StoreError> {
        self.adjust_stock(id, quantity, |stock, qty| stock.saturating_sub(qty))
    }

    /// Restock: stock rises by `quantity` and the status is re-derived.
    pub fn restock(&mut self, id: i64, quantity: u32) -> Result<bool, StoreError> {
        self.adjust_stock(id, quantity, |stock, qty| stock.saturating_add(qty))
    }

    fn adjust_stock(
        &mut self,
        id: i64,
        quantity: u32,
        apply: impl Fn(u32, u32) -> u32,
    ) -> Result<bool, StoreError> {
        if quantity == 0 {
            return Ok(false);
        }
        let mut next = self.products.clone();
        let Some(record) = next.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        record.stock = apply(record.stock, quantity);
        record.status = Some(ProductStatus::for_stock(record.stock));
        debug!(id, stock = record.stock, "stock adjusted");
        self.persist(next)?;
        Ok(true)
    }

    /// Millisecond-timestamp id, bumped past the current maximum so two
    /// adds within the same millisecond cannot collide.
    fn fresh_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let max = self.products.iter().map(|p| p.id).max().unwrap_or(0);
        now.max(max + 1)
    }

    fn persist(&mut self, next: Vec<AdminProduct>) -> Result<(), StoreError> {
        self.kv.set(ADMIN_PRODUCTS_KEY, &encode(&next))?;
        self.products = next;
        Ok(())
    }
}

/// Parse multi-line "Key: value" text the way the admin form did: blank
/// lines dropped, keyless lines ignored, a valueless key maps to "—".
fn parse_specifications(text: &str) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (key, value) = match line.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (line, ""),
        };
        if key.is_empty() {
            continue;
        }
        let value = if value.is_empty() { "—" } else { value };
        specs.insert(key.to_owned(), value.to_owned());
    }
    specs
}
