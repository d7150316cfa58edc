// apps/storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use motogear_core::catalog::{self, CatalogQuery, SortOrder};
use motogear_core::format_price;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct ListProductsQuery {
  pub q: Option<String>,
  pub category: Option<String>,
  pub sort: Option<String>,
}

pub const PRODUCT_NOT_FOUND_MESSAGE: &str = "Producto no encontrado";

#[instrument(name = "handler::list_products", skip(app_state, query_params), fields(q = ?query_params.q, category = ?query_params.category, sort = ?query_params.sort))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let sort = match query_params.sort.as_deref() {
    Some(raw) => raw.parse::<SortOrder>()?,
    None => SortOrder::Default,
  };
  let query = CatalogQuery::new(query_params.q.as_deref(), query_params.category.as_deref(), sort);

  let products = query.apply(app_state.products.list_active().await?);
  info!("Catalog query returned {} products.", products.len());

  Ok(HttpResponse::Ok().json(json!({
      "message": "Productos obtenidos.",
      "count": products.len(),
      "category": query.category(),
      "sort": query.sort_order(),
      "products": products
  })))
}

#[instrument(name = "handler::featured_products", skip(app_state))]
pub async fn featured_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = catalog::featured(&app_state.products.list_active().await?);
  Ok(HttpResponse::Ok().json(json!({
      "message": "Productos destacados obtenidos.",
      "products": products
  })))
}

#[instrument(name = "handler::offers", skip(app_state))]
pub async fn offers_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = catalog::offers(&app_state.products.list_active().await?);
  Ok(HttpResponse::Ok().json(json!({
      "message": "Ofertas obtenidas.",
      "products": products
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  match app_state.products.find(product_id).await? {
    Some(product) if product.is_active => Ok(HttpResponse::Ok().json(json!({
        "message": "Producto obtenido.",
        "display_price": format_price(product.price_cents),
        "display_original_price": product.original_price_cents.map(format_price),
        "category_name": catalog::category_name(&product.category),
        "product": product
    }))),
    _ => {
      warn!("Product with ID {} not found or inactive.", product_id);
      Err(AppError::NotFound(PRODUCT_NOT_FOUND_MESSAGE.to_string()))
    }
  }
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = catalog::category_counts(&app_state.products.list_active().await?);
  Ok(HttpResponse::Ok().json(json!({
      "message": "Categorías obtenidas.",
      "categories": categories
  })))
}
