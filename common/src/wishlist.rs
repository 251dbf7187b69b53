use serde::{Deserialize, Serialize};

use crate::product::ProductId;

/// A saved-item marker. No quantity; at most one entry per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: String,
    pub product_id: ProductId,
}
