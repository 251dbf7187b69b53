//! The merged product catalog: admin-added records first, built-in
//! products after.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use anugadget_common::admin::AdminProduct;
use anugadget_common::builtin;
use anugadget_common::product::Product;
use tracing::debug;

use crate::admin::ADMIN_PRODUCTS_KEY;
use crate::kv::{decode_list, KvStore};

/// Simulated fetch latency so interactive callers can render a loading
/// state. The load cannot actually fail.
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(300);

/// Read-only provider of the unified catalog.
pub struct Catalog {
    kv: Arc<dyn KvStore>,
    load_delay: Duration,
}

impl Catalog {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Catalog {
            kv,
            load_delay: DEFAULT_LOAD_DELAY,
        }
    }

    /// Override the artificial delay (zero for tests and batch callers).
    pub fn with_delay(kv: Arc<dyn KvStore>, load_delay: Duration) -> Self {
        Catalog { kv, load_delay }
    }

    /// Deliver the merged catalog after the artificial load delay.
    pub async fn list(&self) -> Vec<Product> {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        self.snapshot()
    }

    /// Synchronous read of the same merged catalog. Malformed or absent
    /// admin records degrade to an empty extension list.
    pub fn snapshot(&self) -> Vec<Product> {
        let admin: Vec<AdminProduct> = decode_list(self.kv.get(ADMIN_PRODUCTS_KEY));
        let mut items: Vec<Product> = admin.iter().map(AdminProduct::to_product).collect();
        let extension = items.len();
        items.extend(builtin::products());
        debug!(total = items.len(), extension, "catalog snapshot");
        items
    }
}

/// Deals rail: products whose original price strictly exceeds the current
/// price, first `limit` in catalog order.
pub fn mega_deals(items: &[Product], limit: usize) -> Vec<Product> {
    items
        .iter()
        .filter(|p| p.is_deal())
        .take(limit)
        .cloned()
        .collect()
}

/// Top-selling rail: everything the deals rail did not claim, first `limit`.
pub fn top_selling(items: &[Product], limit: usize) -> Vec<Product> {
    let claimed: BTreeSet<_> = mega_deals(items, limit)
        .into_iter()
        .map(|p| p.id)
        .collect();
    items
        .iter()
        .filter(|p| !claimed.contains(&p.id))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{AdminCatalogStore, NewProduct};
    use crate::kv::MemoryKv;

    fn kv() -> Arc<dyn KvStore> {
        Arc::new(MemoryKv::new())
    }

    #[tokio::test]
    async fn builtin_catalog_when_no_admin_records() {
        let catalog = Catalog::with_delay(kv(), Duration::ZERO);
        let items = catalog.list().await;
        assert_eq!(items.len(), builtin::products().len());
    }

    #[tokio::test]
    async fn admin_records_come_first() {
        let kv = kv();
        let mut admin = AdminCatalogStore::load(kv.clone());
        admin
            .add(NewProduct {
                name: "Samsung Galaxy S24 Ultra".into(),
                category: "Phones".into(),
                price: 1_100_000,
                stock: 3,
                ..NewProduct::default()
            })
            .unwrap();

        let items = Catalog::with_delay(kv, Duration::ZERO).list().await;
        assert_eq!(items.len(), builtin::products().len() + 1);
        assert_eq!(items[0].name, "Samsung Galaxy S24 Ultra");
        assert_eq!(items[1].id.as_str(), "iphone-15-pro-max");
    }

    #[test]
    fn malformed_admin_records_degrade_to_builtin_only() {
        let kv = kv();
        kv.set(ADMIN_PRODUCTS_KEY, "{{{").unwrap();
        let items = Catalog::with_delay(kv, Duration::ZERO).snapshot();
        assert_eq!(items.len(), builtin::products().len());
    }

    #[test]
    fn deal_rails_do_not_overlap() {
        let items = builtin::products();
        let deals = mega_deals(&items, 6);
        let top = top_selling(&items, 6);
        // Every built-in product is discounted, so the deal rail claims all
        assert_eq!(deals.len(), 6);
        assert!(top.is_empty());

        let deals = mega_deals(&items, 2);
        let top = top_selling(&items, 2);
        assert_eq!(deals.len(), 2);
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|p| deals.iter().all(|d| d.id != p.id)));
    }
}
