use serde::{Deserialize, Serialize};

use crate::product::ProductId;

/// One (product, quantity) pairing in the shopper's cart. Field names are
/// the persisted wire names; `id` is unique per line, not per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub product_id: ProductId,
    /// Always >= 1 while the line exists; a line at 0 is removed instead.
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_roundtrip() {
        let json = r#"{"id":"airpods-pro-2-1736500000000","product_id":"airpods-pro-2","quantity":2}"#;
        let line: CartLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.product_id, ProductId::from("airpods-pro-2"));
        assert_eq!(line.quantity, 2);
        assert_eq!(serde_json::to_string(&line).unwrap(), json);
    }
}
