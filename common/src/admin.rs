use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::product::{Product, ProductId};

/// Image shown when a record carries no usable image reference.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Stock-derived availability shown in the admin product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    OutOfStock,
}

impl ProductStatus {
    pub fn for_stock(stock: u32) -> Self {
        if stock == 0 {
            ProductStatus::OutOfStock
        } else {
            ProductStatus::Active
        }
    }
}

/// A catalog-extension record created through the admin form. Loosely typed
/// on the wire (image may arrive as an explicit URL, an uploaded data URL,
/// or a gallery); [`AdminProduct::to_product`] maps it into the unified
/// [`Product`] shape with a defined fallback for every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminProduct {
    /// Millisecond-timestamp identifier assigned at creation.
    pub id: i64,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub category: String,
    #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(default, rename = "oldPrice", skip_serializing_if = "Option::is_none")]
    pub old_price: Option<u64>,
}

impl AdminProduct {
    /// The stored status when present, else derived from stock.
    pub fn effective_status(&self) -> ProductStatus {
        self.status.unwrap_or_else(|| ProductStatus::for_stock(self.stock))
    }

    /// Primary display image: explicit URL, else resolved upload, else the
    /// first gallery entry, else the placeholder.
    pub fn primary_image(&self) -> String {
        for candidate in [self.image_url.as_deref(), self.image.as_deref()]
            .into_iter()
            .flatten()
            .chain(self.images.first().map(String::as_str))
        {
            let candidate = candidate.trim();
            if !candidate.is_empty() {
                return candidate.to_owned();
            }
        }
        PLACEHOLDER_IMAGE.to_owned()
    }

    /// Creation time encoded in the identifier. An out-of-range id falls
    /// back to the epoch rather than failing.
    pub fn created_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.id).single().unwrap_or_default()
    }

    /// Total mapping into the unified catalog shape: description defaults to
    /// empty, featured to false, and the image preference chain always
    /// produces something displayable.
    pub fn to_product(&self) -> Product {
        let image = self.primary_image();
        let images = if self.images.is_empty() {
            vec![image.clone()]
        } else {
            self.images.clone()
        };
        Product {
            id: ProductId(self.id.to_string()),
            name: self.name.clone(),
            price: self.price,
            original_price: self.old_price,
            image_url: Some(image),
            images,
            category: self.category.clone(),
            brand: None,
            description: String::new(),
            specifications: self.specifications.clone(),
            features: self.features.clone(),
            created_at: self.created_at(),
            is_featured: false,
        }
    }
}
