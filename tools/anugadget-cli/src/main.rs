//! Anu Gadget storefront CLI.
//!
//! Local, file-backed admin and shopper surface over the store state:
//! browse the merged catalog through the shop filter pipeline, manage
//! admin products and stock, and drive the cart, wishlist and coupon
//! stores without a browser. State lives as one JSON file per key under
//! `--data-dir` (default: the platform data directory).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use anugadget_common::coupon::payable_total;
use anugadget_common::currency::format_naira;
use anugadget_common::product::{Product, ProductId};
use anugadget_store::admin::{AdminCatalogStore, NewProduct};
use anugadget_store::cart::CartStore;
use anugadget_store::catalog::Catalog;
use anugadget_store::coupon::CouponEngine;
use anugadget_store::kv::{FileKv, KvStore};
use anugadget_store::query::{facets, ShopQuery, SortMode};
use anugadget_store::settings::SettingsStore;
use anugadget_store::wishlist::WishlistStore;

#[derive(Parser)]
#[command(name = "anugadget", about = "Anu Gadget storefront CLI")]
struct Cli {
    /// Directory holding the store's persisted state.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the catalog through the shop filter pipeline.
    Catalog {
        /// Free-text search over name, description, brand and category.
        #[arg(long)]
        search: Option<String>,
        /// Keep only these categories (repeatable).
        #[arg(long)]
        category: Vec<String>,
        /// Keep only these brands (repeatable).
        #[arg(long)]
        brand: Vec<String>,
        /// Lower price bound, inclusive.
        #[arg(long)]
        min_price: Option<u64>,
        /// Upper price bound, inclusive.
        #[arg(long)]
        max_price: Option<u64>,
        /// featured, price-low, price-high or newest.
        #[arg(long, default_value_t = SortMode::Featured)]
        sort: SortMode,
        /// Show category/brand facet counts instead of products.
        #[arg(long)]
        facets: bool,
    },
    /// Manage admin-added products.
    #[command(subcommand)]
    Product(ProductCmd),
    /// Inspect and mutate the cart.
    #[command(subcommand)]
    Cart(CartCmd),
    /// Inspect and mutate the wishlist.
    #[command(subcommand)]
    Wishlist(WishlistCmd),
    /// Apply or remove a coupon code.
    #[command(subcommand)]
    Coupon(CouponCmd),
    /// Show or update store settings.
    #[command(subcommand)]
    Settings(SettingsCmd),
}

#[derive(Subcommand)]
enum ProductCmd {
    /// Add a product to the admin catalog extension.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        price: u64,
        #[arg(long)]
        old_price: Option<u64>,
        #[arg(long, default_value_t = 0)]
        stock: u32,
        #[arg(long, default_value = "")]
        image_url: String,
        /// Multi-line "Key: value" specifications.
        #[arg(long, default_value = "")]
        specifications: String,
        /// One feature per line.
        #[arg(long, default_value = "")]
        features: String,
    },
    /// List admin-added products.
    List,
    /// Remove an admin-added product.
    Rm { id: i64 },
    /// Record an offline sale against a product's stock.
    Sale { id: i64, quantity: u32 },
    /// Add stock to a product.
    Restock { id: i64, quantity: u32 },
}

#[derive(Subcommand)]
enum CartCmd {
    /// Add a product to the cart by product id.
    Add {
        product_id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Replace a line's quantity (0 removes the line).
    Set { line_id: String, quantity: i64 },
    /// Remove a line by line id.
    Rm { line_id: String },
    /// Empty the cart.
    Clear,
    /// Show the cart with totals and any applied coupon.
    Show,
}

#[derive(Subcommand)]
enum WishlistCmd {
    Add { product_id: String },
    Rm { entry_id: String },
    Show,
}

#[derive(Subcommand)]
enum CouponCmd {
    /// Validate a code against the current cart subtotal and apply it.
    Apply { code: String },
    /// Remove the applied coupon.
    Rm,
}

#[derive(Subcommand)]
enum SettingsCmd {
    Show,
    Set {
        #[arg(long)]
        store_name: Option<String>,
        #[arg(long)]
        contact_email: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let dir = cli.data_dir.unwrap_or_else(default_data_dir);
    tracing::debug!(dir = %dir.display(), "opening store directory");
    let kv: Arc<dyn KvStore> = Arc::new(FileKv::open(&dir).context("opening store directory")?);
    // No loading state to render here, so skip the artificial fetch delay
    let catalog = Catalog::with_delay(kv.clone(), Duration::ZERO);

    match cli.command {
        Command::Catalog {
            search,
            category,
            brand,
            min_price,
            max_price,
            sort,
            facets: show_facets,
        } => {
            let items = catalog.list().await;
            if show_facets {
                let f = facets(&items);
                println!("Categories:");
                for facet in f.categories {
                    println!("  {} ({})", facet.label, facet.count);
                }
                println!("Brands:");
                for facet in f.brands {
                    println!("  {} ({})", facet.label, facet.count);
                }
                return Ok(());
            }

            let mut query = ShopQuery::default();
            query.search = search.unwrap_or_default();
            query.categories = category;
            query.brands = brand;
            query.sort = sort;
            if min_price.is_some() || max_price.is_some() {
                let range = query.applied_price();
                query.stage_price_range(
                    min_price.unwrap_or(range.min),
                    max_price.unwrap_or(range.max),
                );
                query.apply_price_range();
            }

            let listed = query.run(&items);
            println!("Showing {} of {} products", listed.len(), items.len());
            for product in &listed {
                print_product(product);
            }
        }

        Command::Product(cmd) => {
            let mut admin = AdminCatalogStore::load(kv);
            match cmd {
                ProductCmd::Add {
                    name,
                    category,
                    price,
                    old_price,
                    stock,
                    image_url,
                    specifications,
                    features,
                } => {
                    let added = admin.add(NewProduct {
                        name,
                        category,
                        price,
                        old_price,
                        stock,
                        image_url,
                        images: Vec::new(),
                        specifications,
                        features,
                    })?;
                    match added {
                        Some(id) => println!("Added product {id}"),
                        None => bail!("rejected: name must be non-blank and price positive"),
                    }
                }
                ProductCmd::List => {
                    for record in admin.products() {
                        println!(
                            "{}  {}  {}  stock {}  [{:?}]",
                            record.id,
                            record.name,
                            format_naira(record.price),
                            record.stock,
                            record.effective_status(),
                        );
                    }
                }
                ProductCmd::Rm { id } => {
                    if !admin.remove(id)? {
                        bail!("no admin product with id {id}");
                    }
                    println!("Removed {id}");
                }
                ProductCmd::Sale { id, quantity } => {
                    if !admin.record_sale(id, quantity)? {
                        bail!("nothing to record (unknown id or zero quantity)");
                    }
                    let record = admin.find(id).expect("just adjusted");
                    println!("Stock now {}", record.stock);
                }
                ProductCmd::Restock { id, quantity } => {
                    if !admin.restock(id, quantity)? {
                        bail!("nothing to record (unknown id or zero quantity)");
                    }
                    let record = admin.find(id).expect("just adjusted");
                    println!("Stock now {}", record.stock);
                }
            }
        }

        Command::Cart(cmd) => {
            let items = catalog.list().await;
            let mut cart = CartStore::load(kv.clone());
            match cmd {
                CartCmd::Add {
                    product_id,
                    quantity,
                } => {
                    cart.add(&ProductId(product_id), quantity)?;
                    sync_coupon(kv, &cart, &items)?;
                    println!("{} items in cart", cart.item_count());
                }
                CartCmd::Set { line_id, quantity } => {
                    cart.update_quantity(&line_id, quantity)?;
                    sync_coupon(kv, &cart, &items)?;
                    println!("{} items in cart", cart.item_count());
                }
                CartCmd::Rm { line_id } => {
                    cart.remove(&line_id)?;
                    sync_coupon(kv, &cart, &items)?;
                    println!("{} items in cart", cart.item_count());
                }
                CartCmd::Clear => {
                    cart.clear()?;
                    sync_coupon(kv, &cart, &items)?;
                    println!("Cart cleared");
                }
                CartCmd::Show => {
                    for resolved in cart.resolved(&items) {
                        match resolved.product {
                            Some(p) => println!(
                                "{}  {} × {}  {}",
                                resolved.line.id,
                                p.name,
                                resolved.line.quantity,
                                format_naira(p.price * u64::from(resolved.line.quantity)),
                            ),
                            None => println!(
                                "{}  (no longer in catalog) × {}",
                                resolved.line.id, resolved.line.quantity
                            ),
                        }
                    }
                    let subtotal = cart.subtotal(&items);
                    println!("Subtotal: {}", format_naira(subtotal));
                    let coupons = CouponEngine::load(kv);
                    if let Some(applied) = coupons.applied() {
                        println!(
                            "Coupon {}: -{}",
                            applied.coupon.code,
                            format_naira(applied.discount_amount)
                        );
                        println!(
                            "Total: {}",
                            format_naira(payable_total(subtotal, applied.discount_amount))
                        );
                    } else {
                        println!("Total: {}", format_naira(subtotal));
                    }
                }
            }
        }

        Command::Wishlist(cmd) => {
            let mut wishlist = WishlistStore::load(kv);
            match cmd {
                WishlistCmd::Add { product_id } => {
                    wishlist.add(&ProductId(product_id))?;
                    println!("{} items saved", wishlist.item_count());
                }
                WishlistCmd::Rm { entry_id } => {
                    wishlist.remove(&entry_id)?;
                    println!("{} items saved", wishlist.item_count());
                }
                WishlistCmd::Show => {
                    let items = catalog.list().await;
                    for (entry, product) in wishlist.resolved(&items) {
                        match product {
                            Some(p) => {
                                println!("{}  {}  {}", entry.id, p.name, format_naira(p.price))
                            }
                            None => println!("{}  (no longer in catalog)", entry.id),
                        }
                    }
                }
            }
        }

        Command::Coupon(cmd) => {
            let mut coupons = CouponEngine::load(kv.clone());
            match cmd {
                CouponCmd::Apply { code } => {
                    let items = catalog.list().await;
                    let cart = CartStore::load(kv);
                    let subtotal = cart.subtotal(&items);
                    if coupons.validate_and_apply(&code, subtotal)? {
                        let applied = coupons.applied().expect("just applied");
                        println!(
                            "Applied {}: -{}",
                            applied.coupon.code,
                            format_naira(applied.discount_amount)
                        );
                    } else {
                        // Invalid codes are a normal negative result
                        println!("Invalid coupon code");
                    }
                }
                CouponCmd::Rm => {
                    coupons.remove()?;
                    println!("Coupon removed");
                }
            }
        }

        Command::Settings(cmd) => {
            let settings = SettingsStore::new(kv);
            match cmd {
                SettingsCmd::Show => {
                    let s = settings.load();
                    println!("Store:   {}", s.store_name);
                    println!("Email:   {}", s.contact_email);
                    println!("Phone:   {}", s.phone_number);
                    println!("Address: {}", s.address);
                }
                SettingsCmd::Set {
                    store_name,
                    contact_email,
                    phone_number,
                    address,
                } => {
                    let mut s = settings.load();
                    if let Some(v) = store_name {
                        s.store_name = v;
                    }
                    if let Some(v) = contact_email {
                        s.contact_email = v;
                    }
                    if let Some(v) = phone_number {
                        s.phone_number = v;
                    }
                    if let Some(v) = address {
                        s.address = v;
                    }
                    settings.save(&s)?;
                    println!("Settings saved");
                }
            }
        }
    }

    Ok(())
}

/// The coupon engine does not watch the cart; push the new subtotal after
/// every cart mutation so a stored percentage discount stays current.
fn sync_coupon(
    kv: Arc<dyn KvStore>,
    cart: &CartStore,
    items: &[Product],
) -> anyhow::Result<()> {
    let mut coupons = CouponEngine::load(kv);
    coupons.recalculate(cart.subtotal(items))?;
    Ok(())
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("anugadget")
}

fn print_product(product: &Product) {
    let mut line = format!(
        "{}  {}  {}",
        product.id,
        product.name,
        format_naira(product.price)
    );
    if let Some(percent) = product.discount_percent() {
        line.push_str(&format!("  (-{percent}%)"));
    }
    if product.is_featured {
        line.push_str("  ★");
    }
    println!("{line}");
}
