//! The shop listing pipeline: a pure function of a catalog snapshot and the
//! active query. Recomputed in full on every input change.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anugadget_common::product::Product;
use serde::{Deserialize, Serialize};

/// Sort order for the shop listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Featured items first; input order otherwise preserved.
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Newest,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(SortMode::Featured),
            "price-low" => Ok(SortMode::PriceLow),
            "price-high" => Ok(SortMode::PriceHigh),
            "newest" => Ok(SortMode::Newest),
            other => Err(format!(
                "unknown sort mode {other:?} (expected featured, price-low, price-high or newest)"
            )),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortMode::Featured => "featured",
            SortMode::PriceLow => "price-low",
            SortMode::PriceHigh => "price-high",
            SortMode::Newest => "newest",
        };
        write!(f, "{s}")
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// The slider's full span: wide open, filters nothing out.
pub const FULL_PRICE_RANGE: PriceRange = PriceRange {
    min: 0,
    max: 5_000_000,
};

/// A category or brand label with its catalog-wide item count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub label: String,
    pub count: usize,
}

/// Sidebar facets. Counts always cover the whole catalog, never the
/// filtered result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogFacets {
    pub categories: Vec<Facet>,
    pub brands: Vec<Facet>,
}

/// Compute facets once per catalog snapshot.
pub fn facets(catalog: &[Product]) -> CatalogFacets {
    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    let mut brands: BTreeMap<String, usize> = BTreeMap::new();
    for product in catalog {
        *categories.entry(product.category.clone()).or_default() += 1;
        if let Some(brand) = &product.brand {
            *brands.entry(brand.clone()).or_default() += 1;
        }
    }
    let collect = |counts: BTreeMap<String, usize>| {
        counts
            .into_iter()
            .map(|(label, count)| Facet { label, count })
            .collect()
    };
    CatalogFacets {
        categories: collect(categories),
        brands: collect(brands),
    }
}

/// The active shop query. The price slider is two-step: `stage_price_range`
/// tracks the live drag and filtering only reacts once `apply_price_range`
/// commits it.
#[derive(Debug, Clone)]
pub struct ShopQuery {
    pub search: String,
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub sort: SortMode,
    staged_price: PriceRange,
    applied_price: PriceRange,
}

impl Default for ShopQuery {
    fn default() -> Self {
        ShopQuery {
            search: String::new(),
            categories: Vec::new(),
            brands: Vec::new(),
            sort: SortMode::Featured,
            staged_price: FULL_PRICE_RANGE,
            applied_price: FULL_PRICE_RANGE,
        }
    }
}

impl ShopQuery {
    /// Track the slider's live value without affecting filtering.
    pub fn stage_price_range(&mut self, min: u64, max: u64) {
        self.staged_price = PriceRange { min, max };
    }

    /// Commit the staged bounds; filtering reacts from here on.
    pub fn apply_price_range(&mut self) {
        self.applied_price = self.staged_price;
    }

    pub fn staged_price(&self) -> PriceRange {
        self.staged_price
    }

    pub fn applied_price(&self) -> PriceRange {
        self.applied_price
    }

    /// Run the full pipeline over a catalog snapshot: search, category and
    /// brand filters, applied price range, then sort. Pure and
    /// deterministic: the same inputs yield the same ordered output.
    pub fn run(&self, catalog: &[Product]) -> Vec<Product> {
        let mut items: Vec<Product> = catalog
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        match self.sort {
            // Stable partition: featured first, relative order preserved
            SortMode::Featured => items.sort_by_key(|p| !p.is_featured),
            SortMode::PriceLow => items.sort_by_key(|p| p.price),
            SortMode::PriceHigh => items.sort_by_key(|p| Reverse(p.price)),
            SortMode::Newest => items.sort_by_key(|p| Reverse(p.created_at)),
        }
        items
    }

    fn matches(&self, product: &Product) -> bool {
        let query = self.search.trim();
        if !query.is_empty() {
            let q = query.to_lowercase();
            let hit = product.name.to_lowercase().contains(&q)
                || product.description.to_lowercase().contains(&q)
                || product
                    .brand
                    .as_deref()
                    .is_some_and(|b| b.to_lowercase().contains(&q))
                || product.category.to_lowercase().contains(&q);
            if !hit {
                return false;
            }
        }

        if !self.categories.is_empty()
            && !self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&product.category))
        {
            return false;
        }

        if !self.brands.is_empty() {
            // Brandless items are excluded whenever a brand filter is active
            let Some(brand) = product.brand.as_deref() else {
                return false;
            };
            if !self.brands.iter().any(|b| b.eq_ignore_ascii_case(brand)) {
                return false;
            }
        }

        self.applied_price.contains(product.price)
    }
}
