//! Coupon application against the fixed table.
//!
//! The engine does not observe the cart: callers pass the current subtotal
//! on every apply and push subtotal changes through [`CouponEngine::recalculate`].

use std::sync::Arc;

use anugadget_common::coupon::{AppliedCoupon, Coupon};
use tracing::debug;

use crate::kv::{encode, KvStore, StoreError};

/// Storage key owned by the coupon engine.
pub const COUPON_KEY: &str = "anugadget_coupon_v1";

pub struct CouponEngine {
    kv: Arc<dyn KvStore>,
    applied: Option<AppliedCoupon>,
}

impl CouponEngine {
    /// Load any previously applied coupon. Malformed stored data means no
    /// coupon is applied.
    pub fn load(kv: Arc<dyn KvStore>) -> Self {
        let applied = kv
            .get(COUPON_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok());
        CouponEngine { kv, applied }
    }

    pub fn applied(&self) -> Option<&AppliedCoupon> {
        self.applied.as_ref()
    }

    /// Canonicalize and look up `code`. On a hit, persist the coupon with
    /// its discount computed against `subtotal` and return true; applying a
    /// different code supersedes the previous one. On a miss return false
    /// and leave any previously applied coupon untouched.
    pub fn validate_and_apply(&mut self, code: &str, subtotal: u64) -> Result<bool, StoreError> {
        let Some(coupon) = Coupon::lookup(code) else {
            debug!(code, "unknown coupon code");
            return Ok(false);
        };
        let applied = AppliedCoupon {
            discount_amount: coupon.discount_for(subtotal),
            coupon,
        };
        self.kv.set(COUPON_KEY, &encode(&applied))?;
        self.applied = Some(applied);
        Ok(true)
    }

    /// Clear the applied coupon, in memory and in storage.
    pub fn remove(&mut self) -> Result<(), StoreError> {
        self.kv.remove(COUPON_KEY)?;
        self.applied = None;
        Ok(())
    }

    /// Recompute the stored discount against a new subtotal. No-op when no
    /// coupon is applied; a flat coupon's amount does not change.
    pub fn recalculate(&mut self, subtotal: u64) -> Result<(), StoreError> {
        let Some(current) = self.applied.clone() else {
            return Ok(());
        };
        let updated = AppliedCoupon {
            discount_amount: current.coupon.discount_for(subtotal),
            coupon: current.coupon,
        };
        self.kv.set(COUPON_KEY, &encode(&updated))?;
        self.applied = Some(updated);
        Ok(())
    }
}
