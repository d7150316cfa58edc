// apps/storefront/src/services/mod.rs

pub mod auth_service;
pub mod cart_store;
pub mod checkout_service;
pub mod payment_gateway;
pub mod payment_mock;
