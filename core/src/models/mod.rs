// core/src/models/mod.rs

pub mod order;
pub mod product;
pub mod profile;

pub use order::{is_plausible_email, Order, OrderItem, OrderStatus, OrderWithItems, ShippingContact};
pub use product::{Product, ProductInput, ProductUpdate, MAX_PRICE_CENTS, MAX_STOCK};
pub use profile::{Profile, Role};
