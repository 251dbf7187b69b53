//! Persistence-backed storefront state.
//!
//! Every store owns exactly one key in a [`kv::KvStore`], keeps an in-memory
//! mirror of the decoded value, and writes the full value back before
//! updating the mirror. Reads never fail: absent or malformed stored data
//! degrades to an empty or default value throughout.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod kv;
pub mod query;
pub mod settings;
pub mod wishlist;

pub use kv::{FileKv, KvStore, MemoryKv, StoreError};
