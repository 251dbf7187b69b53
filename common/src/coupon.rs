use serde::{Deserialize, Serialize};

/// How a coupon reduces the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// `value` percent off the subtotal, rounded to the nearest naira.
    Percentage,
    /// `value` naira off, regardless of subtotal.
    Flat,
}

/// A code mapping to a discount rule. Codes are canonicalized to uppercase
/// before lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub code: String,
    #[serde(rename = "discount_type")]
    pub kind: DiscountKind,
    #[serde(rename = "discount_value")]
    pub value: u64,
}

impl Coupon {
    /// The fixed coupon table. Not user-editable.
    pub fn all() -> Vec<Coupon> {
        vec![
            Coupon {
                id: "welcome10".into(),
                code: "WELCOME10".into(),
                kind: DiscountKind::Percentage,
                value: 10,
            },
            Coupon {
                id: "flat5000".into(),
                code: "FLAT5000".into(),
                kind: DiscountKind::Flat,
                value: 5000,
            },
        ]
    }

    /// Trim and uppercase `code`, then look it up by exact match.
    pub fn lookup(code: &str) -> Option<Coupon> {
        let normalized = code.trim().to_uppercase();
        Coupon::all().into_iter().find(|c| c.code == normalized)
    }

    /// Discount amount against a subtotal. A flat coupon's amount is taken
    /// verbatim and may exceed the subtotal; callers clamp the displayed
    /// total through [`payable_total`].
    pub fn discount_for(&self, subtotal: u64) -> u64 {
        match self.kind {
            DiscountKind::Percentage => (self.value * subtotal + 50) / 100,
            DiscountKind::Flat => self.value,
        }
    }
}

/// A coupon as persisted after application: the rule plus the discount
/// computed against the subtotal it was last applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    #[serde(flatten)]
    pub coupon: Coupon,
    #[serde(rename = "discountAmount")]
    pub discount_amount: u64,
}

/// Total due after discount, saturating at zero so an oversized flat coupon
/// never surfaces a negative total.
pub fn payable_total(subtotal: u64, discount: u64) -> u64 {
    subtotal.saturating_sub(discount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_canonicalizes() {
        assert!(Coupon::lookup("welcome10").is_some());
        assert!(Coupon::lookup("  Welcome10  ").is_some());
        assert!(Coupon::lookup("FLAT5000").is_some());
        assert!(Coupon::lookup("nope").is_none());
        assert!(Coupon::lookup("").is_none());
    }

    #[test]
    fn percentage_discount_rounds() {
        let c = Coupon::lookup("WELCOME10").unwrap();
        assert_eq!(c.discount_for(100_000), 10_000);
        // 10% of 5 naira is 0.5, rounds up
        assert_eq!(c.discount_for(5), 1);
        assert_eq!(c.discount_for(4), 0);
        assert_eq!(c.discount_for(0), 0);
    }

    #[test]
    fn flat_discount_ignores_subtotal() {
        let c = Coupon::lookup("FLAT5000").unwrap();
        assert_eq!(c.discount_for(100_000), 5000);
        assert_eq!(c.discount_for(0), 5000);
        // Not clamped: larger than the subtotal it applies to
        assert_eq!(c.discount_for(1000), 5000);
    }

    #[test]
    fn payable_total_saturates() {
        assert_eq!(payable_total(100_000, 10_000), 90_000);
        assert_eq!(payable_total(1000, 5000), 0);
    }

    #[test]
    fn applied_coupon_wire_format() {
        let applied = AppliedCoupon {
            coupon: Coupon::lookup("WELCOME10").unwrap(),
            discount_amount: 10_000,
        };
        let json = serde_json::to_value(&applied).unwrap();
        assert_eq!(json["id"], "welcome10");
        assert_eq!(json["code"], "WELCOME10");
        assert_eq!(json["discount_type"], "percentage");
        assert_eq!(json["discount_value"], 10);
        assert_eq!(json["discountAmount"], 10_000);

        let back: AppliedCoupon = serde_json::from_value(json).unwrap();
        assert_eq!(back, applied);
    }
}
