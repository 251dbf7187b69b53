//! End-to-end shopper flows over the real store stack: admin extension →
//! catalog → shop query → cart → coupon → payable total, on both backends.

use std::sync::Arc;
use std::time::Duration;

use anugadget_common::coupon::payable_total;
use anugadget_common::product::ProductId;
use anugadget_store::admin::{AdminCatalogStore, NewProduct};
use anugadget_store::cart::CartStore;
use anugadget_store::catalog::Catalog;
use anugadget_store::coupon::CouponEngine;
use anugadget_store::kv::{FileKv, KvStore, MemoryKv};
use anugadget_store::query::{ShopQuery, SortMode};
use anugadget_store::settings::{SettingsStore, SETTINGS_KEY};
use anugadget_store::wishlist::WishlistStore;

#[tokio::test]
async fn full_shopper_flow() {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new());

    // Admin extends the catalog
    let mut admin = AdminCatalogStore::load(kv.clone());
    let galaxy_id = admin
        .add(NewProduct {
            name: "Samsung Galaxy S24 Ultra".into(),
            category: "Phones".into(),
            price: 1_100_000,
            old_price: Some(1_300_000),
            stock: 5,
            ..NewProduct::default()
        })
        .unwrap()
        .unwrap();

    // Shopper browses: admin item first, then the built-ins
    let catalog = Catalog::with_delay(kv.clone(), Duration::ZERO);
    let items = catalog.list().await;
    assert_eq!(items[0].name, "Samsung Galaxy S24 Ultra");

    // Narrow to phones under 1.2M, cheapest first
    let mut query = ShopQuery::default();
    query.categories = vec!["Phones".into()];
    query.sort = SortMode::PriceLow;
    query.stage_price_range(0, 1_200_000);
    query.apply_price_range();
    let listed = query.run(&items);
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "Samsung Galaxy S24 Ultra");
    assert_eq!(listed[1].id.as_str(), "iphone-15-pro-max");

    // Cart: one admin item, two earbuds
    let mut cart = CartStore::load(kv.clone());
    cart.add(&ProductId(galaxy_id.to_string()), 1).unwrap();
    cart.add(&ProductId::from("airpods-pro-2"), 2).unwrap();
    let subtotal = cart.subtotal(&items);
    assert_eq!(subtotal, 1_100_000 + 2 * 250_000);

    // Percentage coupon tracks the subtotal through quantity changes
    let mut coupons = CouponEngine::load(kv.clone());
    assert!(coupons.validate_and_apply("welcome10", subtotal).unwrap());
    assert_eq!(coupons.applied().unwrap().discount_amount, 160_000);

    let earbuds_line = cart.lines()[1].id.clone();
    cart.update_quantity(&earbuds_line, 1).unwrap();
    let subtotal = cart.subtotal(&items);
    coupons.recalculate(subtotal).unwrap();
    let discount = coupons.applied().unwrap().discount_amount;
    assert_eq!(discount, 135_000);
    assert_eq!(payable_total(subtotal, discount), 1_215_000);

    // Wishlist is independent of the cart
    let mut wishlist = WishlistStore::load(kv.clone());
    wishlist.add(&ProductId::from("macbook-pro-m3")).unwrap();
    wishlist.add(&ProductId::from("macbook-pro-m3")).unwrap();
    assert_eq!(wishlist.item_count(), 1);

    // Everything survives a "new tab": fresh stores over the same KV
    let cart = CartStore::load(kv.clone());
    assert_eq!(cart.item_count(), 2);
    let coupons = CouponEngine::load(kv.clone());
    assert_eq!(coupons.applied().unwrap().discount_amount, 135_000);
    assert!(WishlistStore::load(kv).contains(&ProductId::from("macbook-pro-m3")));
}

#[tokio::test]
async fn file_backed_state_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("anugadget");

    {
        let kv: Arc<dyn KvStore> = Arc::new(FileKv::open(&dir).unwrap());
        let mut cart = CartStore::load(kv.clone());
        cart.add(&ProductId::from("smart-4k-tv"), 1).unwrap();
        let mut coupons = CouponEngine::load(kv.clone());
        let items = Catalog::with_delay(kv, Duration::ZERO).list().await;
        assert!(coupons
            .validate_and_apply("FLAT5000", cart.subtotal(&items))
            .unwrap());
    }

    let kv: Arc<dyn KvStore> = Arc::new(FileKv::open(&dir).unwrap());
    let cart = CartStore::load(kv.clone());
    assert_eq!(cart.item_count(), 1);
    let coupons = CouponEngine::load(kv);
    assert_eq!(coupons.applied().unwrap().discount_amount, 5000);
}

#[test]
fn settings_change_reaches_same_process_subscribers() {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
    let settings = SettingsStore::new(kv.clone());

    // A second reader over the same KV, as another page of the app would be
    let reader = SettingsStore::new(kv);
    let mut rx = reader.subscribe();

    let mut updated = settings.load();
    updated.store_name = "Anu Gadget Ikeja".into();
    settings.save(&updated).unwrap();

    assert_eq!(rx.try_recv().unwrap(), SETTINGS_KEY);
    assert_eq!(reader.load().store_name, "Anu Gadget Ikeja");
}

#[test]
fn a_dangling_cart_line_never_breaks_totals() {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new());

    let mut admin = AdminCatalogStore::load(kv.clone());
    let id = admin
        .add(NewProduct {
            name: "Limited Drop".into(),
            category: "Gaming".into(),
            price: 400_000,
            stock: 1,
            ..NewProduct::default()
        })
        .unwrap()
        .unwrap();

    let mut cart = CartStore::load(kv.clone());
    cart.add(&ProductId(id.to_string()), 1).unwrap();

    // The admin deletes the product out from under the cart
    admin.remove(id).unwrap();
    let items = Catalog::with_delay(kv, Duration::ZERO).snapshot();

    assert_eq!(cart.subtotal(&items), 0);
    assert_eq!(cart.item_count(), 1);
    let resolved = cart.resolved(&items);
    assert!(resolved[0].product.is_none());
}
