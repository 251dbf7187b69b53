//! The compiled-in product catalog. Immutable for the process lifetime;
//! admin-added records extend it through the catalog provider.

use chrono::{DateTime, TimeZone, Utc};

use crate::product::{Product, ProductId};

fn listed(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid listing date")
}

fn entry(
    id: &str,
    name: &str,
    price: u64,
    original_price: u64,
    image: &str,
    category: &str,
    brand: &str,
    description: &str,
    created_at: DateTime<Utc>,
    is_featured: bool,
) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_owned(),
        price,
        original_price: Some(original_price),
        image_url: Some(image.to_owned()),
        images: vec![image.to_owned()],
        category: category.to_owned(),
        brand: Some(brand.to_owned()),
        description: description.to_owned(),
        specifications: None,
        features: None,
        created_at,
        is_featured,
    }
}

/// The built-in storefront catalog.
pub fn products() -> Vec<Product> {
    vec![
        entry(
            "iphone-15-pro-max",
            "iPhone 15 Pro Max 256GB",
            1_200_000,
            1_450_000,
            "/assets/iphone-15-pro-max.jpg",
            "Phones",
            "Apple",
            "A17 Pro performance, 48MP camera system, and a stunning 6.7-inch ProMotion display.",
            listed(2025, 1, 10),
            true,
        ),
        entry(
            "macbook-pro-m3",
            "MacBook Pro M3 14-inch",
            2_500_000,
            2_850_000,
            "/assets/macbook-pro-m3.jpg",
            "Laptops",
            "Apple",
            "Pro performance with M3 chip, Liquid Retina XDR display, and all-day battery life.",
            listed(2025, 1, 8),
            true,
        ),
        entry(
            "apple-watch-ultra-2",
            "Apple Watch Ultra 2",
            800_000,
            950_000,
            "/assets/apple-watch-ultra-2.jpg",
            "Watches",
            "Apple",
            "Rugged, bright, and packed with outdoor features for athletes and adventurers.",
            listed(2025, 1, 12),
            false,
        ),
        entry(
            "airpods-pro-2",
            "AirPods Pro 2nd Gen",
            250_000,
            320_000,
            "/assets/airpods-pro-2.jpg",
            "Audio",
            "Apple",
            "Powerful noise cancellation, spatial audio, and USB-C charging.",
            listed(2025, 1, 5),
            false,
        ),
        entry(
            "smart-4k-tv",
            "Ultra HD 4K Smart TV 55\"",
            520_000,
            650_000,
            "/assets/hero-banner.jpg",
            "Accessories",
            "Astra",
            "Cinematic 4K clarity with HDR support and smart streaming apps.",
            listed(2025, 1, 3),
            false,
        ),
        entry(
            "gaming-console-pro",
            "GameBox Pro Console",
            680_000,
            750_000,
            "/assets/hero-banner.jpg",
            "Gaming",
            "GameBox",
            "Next-gen gaming performance with ultra-fast SSD and 4K support.",
            listed(2024, 12, 28),
            true,
        ),
    ]
}
