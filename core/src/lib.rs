// src/lib.rs

//! MotoGear core: the records and pure logic behind the MotoGear storefront.
//!
//! Nothing in here performs I/O. The storefront service fetches rows, hands
//! them to these functions and persists what comes back:
//!  - `cart`: the cart container (add, remove, set quantity, open/close).
//!  - `catalog`: search, category filter and stable sorts, offers, featured.
//!  - `checkout`: pricing a checkout request from catalog rows only.
//!  - `pricing`: shipping policy, order summaries and MXN formatting.
//!  - `admin` and `stats`: list filters, counters and dashboard figures.
//!
//! Enable the `sqlx` feature to derive PostgreSQL row and enum mappings on
//! the records in `models`.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod models;
pub mod pricing;
pub mod stats;

// --- Re-exports for the Public API ---

pub use crate::cart::{Cart, CartLine, CartProduct};
pub use crate::catalog::{CatalogQuery, Category, CategoryCount, SortOrder, CATEGORIES};
pub use crate::checkout::{price_items, CheckoutItem, PricedCheckout, PricedLine};
pub use crate::error::{CartError, CheckoutError, CoreError, CoreResult};
pub use crate::models::{
  Order, OrderItem, OrderStatus, OrderWithItems, Product, ProductInput, ProductUpdate, Profile, Role, ShippingContact,
};
pub use crate::pricing::{format_price, OrderSummary, ShippingPolicy};
pub use crate::stats::StoreStats;
