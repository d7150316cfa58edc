// core/src/error.rs
use thiserror::Error;
use uuid::Uuid;

/// Validation and parsing failures for the domain records.
///
/// Messages are shown to shoppers and staff as-is, so they are written in
/// the storefront's language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
  #[error("Producto inválido: {0}")]
  InvalidProduct(String),

  #[error("Estado de pedido desconocido: {0}")]
  UnknownStatus(String),

  #[error("Rol desconocido: {0}")]
  UnknownRole(String),

  #[error("Orden desconocido: {0}")]
  UnknownSort(String),

  #[error("Datos de envío inválidos: {0}")]
  InvalidContact(String),
}

/// Failures of the cart container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
  #[error("El producto {0} no está en el carrito")]
  LineNotFound(Uuid),

  #[error("No puedes agregar más de {max} unidades del producto {product_id}")]
  QuantityTooLarge { product_id: Uuid, max: i32 },
}

/// Reasons a checkout request is rejected before any payment session exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
  #[error("El carrito está vacío")]
  EmptyCart,

  #[error("Cantidad inválida ({quantity}) para el producto {product_id}")]
  InvalidQuantity { product_id: Uuid, quantity: i32 },

  #[error("Producto con id \"{0}\" no encontrado")]
  UnknownProduct(Uuid),

  #[error("El producto \"{name}\" no está disponible")]
  Unavailable { name: String },

  #[error("Stock insuficiente para \"{name}\": solo quedan {available}")]
  InsufficientStock { name: String, available: i32 },

  #[error("El total del pedido excede el máximo permitido")]
  AmountTooLarge,
}

pub type CoreResult<T, E = CoreError> = std::result::Result<T, E>;
