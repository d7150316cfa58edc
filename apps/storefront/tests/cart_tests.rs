// tests/cart_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::json;

use common::*;
use motogear_storefront::web::configure_app_routes;

#[actix_web::test]
async fn test_cart_session_worked_example() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

  let (status, body) = send(&app, test::TestRequest::post().uri("/api/v1/cart").to_request()).await;
  assert_eq!(status, StatusCode::CREATED);
  let cart_id = body["cart"]["cart_id"].as_str().expect("cart id").to_string();
  assert_eq!(body["cart"]["total_items"], 0);
  assert_eq!(body["cart"]["is_open"], false);

  let helmet = product_id(&app, "Casco Pro Carbon").await;
  let gloves = product_id(&app, "Guantes Racing Pro").await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .set_json(json!({ "product_id": helmet, "quantity": 2 }))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .set_json(json!({ "product_id": gloves }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);

  let cart = &body["cart"];
  assert_eq!(cart["total_items"], 3);
  assert_eq!(cart["items"].as_array().map(Vec::len), Some(2));
  assert_eq!(cart["summary"]["subtotal_cents"], 989_700);
  assert_eq!(cart["summary"]["shipping_cents"], 0);
  assert_eq!(cart["summary"]["total_cents"], 989_700);
  assert_eq!(cart["summary"]["free_shipping"], true);
  assert_eq!(cart["display_subtotal"], "$9,897 MXN");

  // Fetching returns the same state.
  let req = test::TestRequest::get().uri(&format!("/api/v1/cart/{}", cart_id)).to_request();
  let (_, body) = send(&app, req).await;
  assert_eq!(body["cart"]["total_items"], 3);
}

#[actix_web::test]
async fn test_cart_quantity_updates_and_removal() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

  let (_, body) = send(&app, test::TestRequest::post().uri("/api/v1/cart").to_request()).await;
  let cart_id = body["cart"]["cart_id"].as_str().expect("cart id").to_string();
  let mount = product_id(&app, "Soporte Movil Pro").await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .set_json(json!({ "product_id": mount }))
    .to_request();
  let (_, body) = send(&app, req).await;
  // Below the free-shipping threshold the flat fee applies.
  assert_eq!(body["cart"]["summary"]["subtotal_cents"], 89_900);
  assert_eq!(body["cart"]["summary"]["shipping_cents"], 19_900);
  assert_eq!(body["cart"]["summary"]["total_cents"], 109_800);
  assert_eq!(body["cart"]["summary"]["remaining_for_free_shipping_cents"], 110_100);

  let line_uri = format!("/api/v1/cart/{}/items/{}", cart_id, mount);
  let req = test::TestRequest::put()
    .uri(&line_uri)
    .set_json(json!({ "quantity": 3 }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["cart"]["total_items"], 3);
  assert_eq!(body["cart"]["summary"]["subtotal_cents"], 269_700);
  assert_eq!(body["cart"]["summary"]["shipping_cents"], 0);

  // Zero removes the line.
  let req = test::TestRequest::put()
    .uri(&line_uri)
    .set_json(json!({ "quantity": 0 }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["cart"]["total_items"], 0);
  assert_eq!(body["cart"]["summary"]["shipping_cents"], 0);

  // Removing a line that is not there is a 404.
  let req = test::TestRequest::delete().uri(&line_uri).to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let req = test::TestRequest::put()
    .uri(&line_uri)
    .set_json(json!({ "quantity": 2 }))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_cart_open_close_and_clear() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

  let (_, body) = send(&app, test::TestRequest::post().uri("/api/v1/cart").to_request()).await;
  let cart_id = body["cart"]["cart_id"].as_str().expect("cart id").to_string();
  let boots = product_id(&app, "Botas Touring Elite").await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/open", cart_id))
    .to_request();
  let (_, body) = send(&app, req).await;
  assert_eq!(body["cart"]["is_open"], true);

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .set_json(json!({ "product_id": boots, "quantity": 2 }))
    .to_request();
  send(&app, req).await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/close", cart_id))
    .to_request();
  let (_, body) = send(&app, req).await;
  assert_eq!(body["cart"]["is_open"], false);
  assert_eq!(body["cart"]["total_items"], 2);

  let req = test::TestRequest::delete()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["cart"]["total_items"], 0);
  assert_eq!(body["cart"]["items"], json!([]));
}

#[actix_web::test]
async fn test_cart_rejects_bad_input() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

  let missing = uuid::Uuid::new_v4();
  let req = test::TestRequest::get().uri(&format!("/api/v1/cart/{}", missing)).to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Carrito no encontrado");

  let (_, body) = send(&app, test::TestRequest::post().uri("/api/v1/cart").to_request()).await;
  let cart_id = body["cart"]["cart_id"].as_str().expect("cart id").to_string();
  let helmet = product_id(&app, "Casco Pro Carbon").await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .set_json(json!({ "product_id": helmet, "quantity": 0 }))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .set_json(json!({ "product_id": uuid::Uuid::new_v4() }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Producto no encontrado");
}

#[actix_web::test]
async fn test_cart_checkout_charges_server_prices() {
  let (state, mock) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

  let (_, body) = send(&app, test::TestRequest::post().uri("/api/v1/cart").to_request()).await;
  let cart_id = body["cart"]["cart_id"].as_str().expect("cart id").to_string();

  // An empty cart cannot be checked out.
  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/checkout", cart_id))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "El carrito está vacío");
  assert!(mock.sessions().is_empty());

  let helmet = product_id(&app, "Casco Pro Carbon").await;
  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .set_json(json!({ "product_id": helmet, "quantity": 2 }))
    .to_request();
  send(&app, req).await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/checkout", cart_id))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["checkout"]["summary"]["total_cents"], 859_800);
  assert_eq!(body["checkout"]["order_id"], serde_json::Value::Null);

  let recorded = mock.last_session().expect("a gateway session");
  assert_eq!(recorded.request.amount_cents(), 859_800);
  assert_eq!(body["checkout"]["session_id"], recorded.session.id.as_str());
  assert_eq!(body["checkout"]["client_secret"], recorded.session.client_secret.as_str());
  assert!(body.get("client_secret").is_none());

  // The cart survives checkout until the client clears it.
  let req = test::TestRequest::get().uri(&format!("/api/v1/cart/{}", cart_id)).to_request();
  let (_, body) = send(&app, req).await;
  assert_eq!(body["cart"]["total_items"], 2);
}

#[actix_web::test]
async fn test_cart_line_quantity_is_capped() {
  let (state, _) = test_state().await;
  let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure_app_routes)).await;

  let (_, body) = send(&app, test::TestRequest::post().uri("/api/v1/cart").to_request()).await;
  let cart_id = body["cart"]["cart_id"].as_str().expect("cart id").to_string();
  let gloves = product_id(&app, "Guantes Racing Pro").await;

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .set_json(json!({ "product_id": gloves, "quantity": 1_000 }))
    .to_request();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap_or_default().contains("999"));

  let req = test::TestRequest::post()
    .uri(&format!("/api/v1/cart/{}/items", cart_id))
    .set_json(json!({ "product_id": gloves, "quantity": 2 }))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);

  let req = test::TestRequest::put()
    .uri(&format!("/api/v1/cart/{}/items/{}", cart_id, gloves))
    .set_json(json!({ "quantity": i32::MAX }))
    .to_request();
  let (status, _) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let req = test::TestRequest::get().uri(&format!("/api/v1/cart/{}", cart_id)).to_request();
  let (_, body) = send(&app, req).await;
  assert_eq!(body["cart"]["total_items"], 2);
}
