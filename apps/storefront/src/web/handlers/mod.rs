// apps/storefront/src/web/handlers/mod.rs

pub mod account_handlers;
pub mod admin_handlers;
pub mod auth_handlers;
pub mod cart_handlers;
pub mod checkout_handlers;
pub mod product_handlers;
