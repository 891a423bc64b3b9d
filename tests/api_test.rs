mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use ecommerce_backend::db::models::{Role, TokenResponse};
use ecommerce_backend::handlers;

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($store))
                .app_data(web::Data::new(common::auth_settings()))
                .configure(handlers::configure),
        )
        .await
    };
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Admins cannot self-register, so they are written straight to the store.
fn seed_admin(store: &ecommerce_backend::db::Store, email: &str) {
    let mut conn = store.conn().unwrap();
    common::user_with_password(&mut conn, email, "secret123", Role::Admin);
}

#[actix_web::test]
async fn test_review_flow_updates_product_rating() {
    let (_dir, store) = common::temp_store();
    seed_admin(&store, "admin@shop.io");
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "buyer@shop.io", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let mut tokens = Vec::new();
    for email in ["buyer@shop.io", "admin@shop.io"] {
        let req = test::TestRequest::post()
            .uri("/users/token")
            .set_json(json!({ "email": email, "password": "secret123" }))
            .to_request();
        let token: TokenResponse = test::call_and_read_body_json(&app, req).await;
        tokens.push(token.access_token);
    }
    let (buyer, admin) = (tokens[0].clone(), tokens[1].clone());

    let req = test::TestRequest::post()
        .uri("/categories")
        .set_json(json!({ "name": "Phones" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let category: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({
            "name": "Phone X",
            "price": 499.0,
            "stock": 3,
            "category_id": category["id"],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = test::read_body_json(resp).await;
    let product_id = product["id"].as_i64().unwrap();
    assert!(product["rating"].is_null());

    let req = test::TestRequest::post()
        .uri("/reviews")
        .set_json(json!({ "product_id": product_id, "grade": 4 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let mut review_ids = Vec::new();
    for grade in [4, 5] {
        let req = test::TestRequest::post()
            .uri("/reviews")
            .insert_header(bearer(&buyer))
            .set_json(json!({ "product_id": product_id, "comment": "ok", "grade": grade }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let review: Value = test::read_body_json(resp).await;
        review_ids.push(review["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::get().uri(&format!("/products/{product_id}")).to_request();
    let product: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(product["rating"], json!(4.5));

    let req = test::TestRequest::delete()
        .uri(&format!("/reviews/{}", review_ids[1]))
        .insert_header(bearer(&buyer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/reviews/{}", review_ids[1]))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&format!("/products/{product_id}")).to_request();
    let product: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(product["rating"], json!(4.0));

    let req = test::TestRequest::delete()
        .uri(&format!("/reviews/{}", review_ids[0]))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&format!("/products/{product_id}")).to_request();
    let product: Value = test::call_and_read_body_json(&app, req).await;
    assert!(product["rating"].is_null());

    let req = test::TestRequest::get().uri("/reviews").to_request();
    let reviews: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(reviews.is_empty());

    let req = test::TestRequest::delete().uri(&format!("/products/{product_id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&format!("/products/{product_id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/reviews")
        .insert_header(bearer(&buyer))
        .set_json(json!({ "product_id": product_id, "grade": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_category_preconditions_map_to_status_codes() {
    let (_dir, store) = common::temp_store();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/categories")
        .set_json(json!({ "name": "Old" }))
        .to_request();
    let old: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/categories/{}", old["id"]))
        .to_request();
    let retired: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(retired["is_active"], json!(false));

    let req = test::TestRequest::post()
        .uri("/categories")
        .set_json(json!({ "name": "New", "parent_id": old["id"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().contains("not found or inactive"));

    let req = test::TestRequest::get()
        .uri(&format!("/categories/{}", old["id"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&format!("/categories/{}", old["id"]))
        .set_json(json!({ "name": "Revived" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/categories")
        .set_json(json!({ "name": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/categories").to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());
}

#[actix_web::test]
async fn test_invalid_token_is_rejected() {
    let (_dir, store) = common::temp_store();
    let app = init_app!(store);

    let req = test::TestRequest::delete()
        .uri("/reviews/1")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_registration_cannot_grant_admin_role() {
    let (_dir, store) = common::temp_store();
    seed_admin(&store, "admin@shop.io");
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "sneaky@shop.io", "password": "secret123", "role": "admin" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["role"], "buyer");

    let req = test::TestRequest::post()
        .uri("/users/token")
        .set_json(json!({ "email": "sneaky@shop.io", "password": "secret123" }))
        .to_request();
    let sneaky: TokenResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/users/admins")
        .insert_header(bearer(&sneaky.access_token))
        .set_json(json!({ "email": "other@shop.io", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri("/users/1")
        .insert_header(bearer(&sneaky.access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/users/token")
        .set_json(json!({ "email": "admin@shop.io", "password": "secret123" }))
        .to_request();
    let admin: TokenResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/users/admins")
        .insert_header(bearer(&admin.access_token))
        .set_json(json!({ "email": "other@shop.io", "password": "secret123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let promoted: Value = test::read_body_json(resp).await;
    assert_eq!(promoted["role"], "admin");
}
