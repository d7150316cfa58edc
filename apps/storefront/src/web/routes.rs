// apps/storefront/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  account_handlers, admin_handlers, auth_handlers, cart_handlers, checkout_handlers, product_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Authentication
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      // Catalog. Literal segments go before `{product_id}`.
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/featured", web::get().to(product_handlers::featured_products_handler))
          .route("/offers", web::get().to(product_handlers::offers_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      .route("/categories", web::get().to(product_handlers::list_categories_handler))
      // Cart sessions
      .service(
        web::scope("/cart")
          .route("", web::post().to(cart_handlers::create_cart_handler))
          .route("/{cart_id}", web::get().to(cart_handlers::get_cart_handler))
          .route("/{cart_id}/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/{cart_id}/items", web::delete().to(cart_handlers::clear_cart_handler))
          .route(
            "/{cart_id}/items/{product_id}",
            web::put().to(cart_handlers::set_quantity_handler),
          )
          .route(
            "/{cart_id}/items/{product_id}",
            web::delete().to(cart_handlers::remove_from_cart_handler),
          )
          .route("/{cart_id}/open", web::post().to(cart_handlers::open_cart_handler))
          .route("/{cart_id}/close", web::post().to(cart_handlers::close_cart_handler))
          .route("/{cart_id}/checkout", web::post().to(cart_handlers::checkout_cart_handler)),
      )
      // Checkout
      .service(web::scope("/checkout").route("", web::post().to(checkout_handlers::start_checkout_handler)))
      // Signed-in account
      .service(
        web::scope("/account")
          .route("/orders", web::get().to(account_handlers::my_orders_handler))
          .route("/orders/{order_id}", web::get().to(account_handlers::my_order_handler)),
      )
      // Manager dashboard
      .service(
        web::scope("/admin")
          .route("/stats", web::get().to(admin_handlers::stats_handler))
          .route("/products", web::get().to(admin_handlers::list_products_handler))
          .route("/products", web::post().to(admin_handlers::create_product_handler))
          .route("/products/{product_id}", web::put().to(admin_handlers::update_product_handler))
          .route("/products/{product_id}", web::delete().to(admin_handlers::delete_product_handler))
          .route(
            "/products/{product_id}/toggle-active",
            web::post().to(admin_handlers::toggle_product_active_handler),
          )
          .route("/orders", web::get().to(admin_handlers::list_orders_handler))
          .route("/orders/{order_id}/status", web::put().to(admin_handlers::set_order_status_handler))
          .route("/users", web::get().to(admin_handlers::list_users_handler))
          .route("/users/{user_id}/role", web::put().to(admin_handlers::set_user_role_handler)),
      ),
  );
}
