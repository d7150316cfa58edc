// tests/admin_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use serial_test::serial;

use common::*;
use motogear_storefront::web::configure_app_routes;

fn find_by_name<'a>(list: &'a Value, name: &str) -> &'a Value {
  list
    .as_array()
    .expect("array")
    .iter()
    .find(|p| p["name"] == name)
    .unwrap_or_else(|| panic!("{} not in list", name))
}

#[actix_web::test]
#[serial]
async fn test_admin_routes_are_manager_only() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

  let (status, body) = send(&app, test::TestRequest::get().uri("/api/v1/admin/stats").to_request()).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "Debes iniciar sesión");

  let customer = customer_token(&app, "fer@example.com").await;
  let req = test::TestRequest::get()
    .uri("/api/v1/admin/products")
    .insert_header(bearer(&customer))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["error"], "Acceso restringido a gerentes");

  let manager = sign_in(&app, MANAGER_EMAIL, MANAGER_PASSWORD).await;
  let req = test::TestRequest::get()
    .uri("/api/v1/admin/stats")
    .insert_header(bearer(&manager))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["stats"]["total_products"], 7);
  assert_eq!(body["stats"]["active_products"], 7);
  assert_eq!(body["stats"]["total_orders"], 0);
  assert_eq!(body["stats"]["revenue_cents"], 0);
  assert_eq!(body["stats"]["average_order_cents"], 0);
  assert_eq!(body["stats"]["total_users"], 2);
}

#[actix_web::test]
#[serial]
async fn test_admin_product_crud_returns_fresh_lists() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;
  let manager = sign_in(&app, MANAGER_EMAIL, MANAGER_PASSWORD).await;

  let req = test::TestRequest::get()
    .uri("/api/v1/admin/products?q=CASCO")
    .insert_header(bearer(&manager))
    .to_request();
  let (_, body) = send(&app, req).await;
  assert_eq!(body["count"], 1);

  let invalid = json!({ "name": "Roto", "price_cents": -1, "category": "partes", "stock": 1 });
  let req = test::TestRequest::post()
    .uri("/api/v1/admin/products")
    .insert_header(bearer(&manager))
    .set_json(&invalid)
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let req = test::TestRequest::post()
    .uri("/api/v1/admin/products")
    .insert_header(bearer(&manager))
    .set_json(json!({
        "name": "Impermeable Lluvia",
        "description": "Traje de lluvia de dos piezas.",
        "price_cents": 149_900,
        "category": "equipamiento",
        "stock": 10
    }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 8);
  // Newest first.
  assert_eq!(body["products"][0]["name"], "Impermeable Lluvia");
  assert_eq!(body["products"][0]["is_active"], true);
  let new_id = body["products"][0]["id"].as_str().expect("id").to_string();

  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/admin/products/{}", new_id))
    .insert_header(bearer(&manager))
    .set_json(json!({
        "name": "Impermeable Lluvia",
        "price_cents": 129_900,
        "original_price_cents": 149_900,
        "category": "equipamiento",
        "stock": 8,
        "discount_percentage": 13
    }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  let updated = find_by_name(&body["products"], "Impermeable Lluvia");
  assert_eq!(updated["price_cents"], 129_900);
  assert_eq!(updated["stock"], 8);

  let (_, offers) = send(&app, test::TestRequest::get().uri("/api/v1/products/offers").to_request()).await;
  assert!(offers["products"].as_array().expect("offers").iter().any(|p| p["id"] == new_id.as_str()));

  let req = test::TestRequest::delete()
    .uri(&format!("/api/v1/admin/products/{}", new_id))
    .insert_header(bearer(&manager))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 7);

  let req = test::TestRequest::delete()
    .uri(&format!("/api/v1/admin/products/{}", new_id))
    .insert_header(bearer(&manager))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[serial]
async fn test_admin_update_keeps_fields_left_out_of_the_form() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;
  let manager = sign_in(&app, MANAGER_EMAIL, MANAGER_PASSWORD).await;
  let helmet = product_id(&app, "Casco Pro Carbon").await;

  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/admin/products/{}", helmet))
    .insert_header(bearer(&manager))
    .set_json(json!({
        "name": "Casco Pro Carbon",
        "price_cents": 399_900,
        "category": "cascos",
        "stock": 12
    }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  let updated = find_by_name(&body["products"], "Casco Pro Carbon");
  assert_eq!(updated["price_cents"], 399_900);
  assert_eq!(updated["stock"], 12);
  assert_eq!(updated["rating"], 4.8);
  assert_eq!(updated["reviews_count"], 234);
  assert_eq!(updated["is_featured"], true);
  assert_eq!(updated["image_url"], "/images/products/helmet-pro.jpg");
  assert_eq!(updated["original_price_cents"], 519_900);

  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/admin/products/{}", helmet))
    .insert_header(bearer(&manager))
    .set_json(json!({ "price_cents": i64::MAX / 2 }))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn test_admin_toggle_hides_product_from_catalog() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;
  let manager = sign_in(&app, MANAGER_EMAIL, MANAGER_PASSWORD).await;
  let helmet = product_id(&app, "Casco Pro Carbon").await;

  let toggle = || {
    test::TestRequest::post()
      .uri(&format!("/api/v1/admin/products/{}/toggle-active", helmet))
      .insert_header(bearer(&manager))
      .to_request()
  };

  let (status, body) = send(&app, toggle()).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(find_by_name(&body["products"], "Casco Pro Carbon")["is_active"], false);

  let (_, catalog) = send(&app, test::TestRequest::get().uri("/api/v1/products").to_request()).await;
  assert_eq!(catalog["count"], 6);
  let req = test::TestRequest::get().uri(&format!("/api/v1/products/{}", helmet)).to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, body) = send(&app, toggle()).await;
  assert_eq!(find_by_name(&body["products"], "Casco Pro Carbon")["is_active"], true);
  let (_, catalog) = send(&app, test::TestRequest::get().uri("/api/v1/products").to_request()).await;
  assert_eq!(catalog["count"], 7);
}

#[actix_web::test]
#[serial]
async fn test_admin_order_status_and_stats() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;
  let manager = sign_in(&app, MANAGER_EMAIL, MANAGER_PASSWORD).await;
  let customer = customer_token(&app, "gabi@example.com").await;
  let helmet = product_id(&app, "Casco Pro Carbon").await;
  let gloves = product_id(&app, "Guantes Racing Pro").await;

  let req = test::TestRequest::post()
    .uri("/api/v1/checkout")
    .insert_header(bearer(&customer))
    .set_json(json!({
        "items": [{ "product_id": helmet, "quantity": 2 }, { "product_id": gloves, "quantity": 1 }],
        "shipping": { "name": "Gabi Moto", "email": "gabi@example.com" }
    }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  let order_id = body["checkout"]["order_id"].as_str().expect("order id").to_string();

  let req = test::TestRequest::get()
    .uri("/api/v1/admin/orders?q=gabi")
    .insert_header(bearer(&manager))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 1);
  assert_eq!(body["status_counts"]["pendiente"], 1);
  assert_eq!(body["status_counts"]["enviado"], 0);

  let status_uri = format!("/api/v1/admin/orders/{}/status", order_id);
  let req = test::TestRequest::put()
    .uri(&status_uri)
    .insert_header(bearer(&manager))
    .set_json(json!({ "status": "enviado" }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["orders"][0]["status"], "enviado");
  assert_eq!(body["status_counts"]["enviado"], 1);
  assert_eq!(body["status_counts"]["pendiente"], 0);

  let req = test::TestRequest::put()
    .uri(&status_uri)
    .insert_header(bearer(&manager))
    .set_json(json!({ "status": "perdido" }))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/admin/orders/{}/status", uuid::Uuid::new_v4()))
    .insert_header(bearer(&manager))
    .set_json(json!({ "status": "entregado" }))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let stats_req = || {
    test::TestRequest::get()
      .uri("/api/v1/admin/stats")
      .insert_header(bearer(&manager))
      .to_request()
  };
  let (_, body) = send(&app, stats_req()).await;
  assert_eq!(body["stats"]["total_orders"], 1);
  assert_eq!(body["stats"]["revenue_cents"], 989_700);
  assert_eq!(body["stats"]["average_order_cents"], 989_700);

  // The customer sees the new status on their own order.
  let req = test::TestRequest::get()
    .uri("/api/v1/account/orders")
    .insert_header(bearer(&customer))
    .to_request();
  let (_, body) = send(&app, req).await;
  assert_eq!(body["orders"][0]["status"], "enviado");

  // Cancelled orders drop out of revenue but still count as orders.
  let req = test::TestRequest::put()
    .uri(&status_uri)
    .insert_header(bearer(&manager))
    .set_json(json!({ "status": "cancelado" }))
    .to_request();
  send(&app, req).await;
  let (_, body) = send(&app, stats_req()).await;
  assert_eq!(body["stats"]["total_orders"], 1);
  assert_eq!(body["stats"]["revenue_cents"], 0);
  assert_eq!(body["stats"]["average_order_cents"], 0);
}

#[actix_web::test]
#[serial]
async fn test_admin_role_changes_take_effect_immediately() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;
  let manager = sign_in(&app, MANAGER_EMAIL, MANAGER_PASSWORD).await;
  let customer = customer_token(&app, "hugo@example.com").await;

  let users_req = |q: &str| {
    test::TestRequest::get()
      .uri(&format!("/api/v1/admin/users?q={}", q))
      .insert_header(bearer(&manager))
      .to_request()
  };
  let (status, body) = send(&app, users_req("hugo")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 1);
  assert_eq!(body["role_counts"], json!({ "customers": 1, "staff": 1, "managers": 1 }));
  let user_id = body["users"][0]["id"].as_str().expect("user id").to_string();

  let role_uri = format!("/api/v1/admin/users/{}/role", user_id);
  let req = test::TestRequest::put()
    .uri(&role_uri)
    .insert_header(bearer(&manager))
    .set_json(json!({ "role": "empleado" }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["role_counts"], json!({ "customers": 0, "staff": 2, "managers": 1 }));

  // Employees are still kept out of the dashboard.
  let req = test::TestRequest::get()
    .uri("/api/v1/admin/stats")
    .insert_header(bearer(&customer))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let req = test::TestRequest::put()
    .uri(&role_uri)
    .insert_header(bearer(&manager))
    .set_json(json!({ "role": "gerente" }))
    .to_request();
  send(&app, req).await;
  let req = test::TestRequest::get()
    .uri("/api/v1/admin/stats")
    .insert_header(bearer(&customer))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);

  let req = test::TestRequest::put()
    .uri(&role_uri)
    .insert_header(bearer(&manager))
    .set_json(json!({ "role": "dueño" }))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/admin/users/{}/role", uuid::Uuid::new_v4()))
    .insert_header(bearer(&manager))
    .set_json(json!({ "role": "cliente" }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Usuario no encontrado");
}
