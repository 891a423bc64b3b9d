use actix_web::{web, HttpResponse};

use crate::auth::{current_user, AuthUser};
use crate::db::models::{ReviewCreate, ReviewUpdate};
use crate::db::Store;
use crate::error::ShopResult;
use crate::handlers::with_conn;
use crate::services::reviews;

pub async fn list_reviews(store: web::Data<Store>) -> ShopResult<HttpResponse> {
    let found = with_conn(store, reviews::list_active).await?;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn get_product_reviews(
    store: web::Data<Store>,
    product_id: web::Path<i32>,
) -> ShopResult<HttpResponse> {
    let product_id = product_id.into_inner();
    let found = with_conn(store, move |conn| reviews::list_for_product(conn, product_id)).await?;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn get_review(store: web::Data<Store>, id: web::Path<i32>) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let review = with_conn(store, move |conn| reviews::get(conn, id)).await?;
    Ok(HttpResponse::Ok().json(review))
}

pub async fn create_review(
    store: web::Data<Store>,
    auth: AuthUser,
    review: web::Json<ReviewCreate>,
) -> ShopResult<HttpResponse> {
    let input = review.into_inner();
    let review = with_conn(store, move |conn| {
        let user = current_user(conn, &auth)?;
        reviews::create(conn, &user, input)
    })
    .await?;
    Ok(HttpResponse::Created().json(review))
}

pub async fn update_review(
    store: web::Data<Store>,
    auth: AuthUser,
    id: web::Path<i32>,
    review: web::Json<ReviewUpdate>,
) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let input = review.into_inner();
    let review = with_conn(store, move |conn| {
        let user = current_user(conn, &auth)?;
        reviews::update(conn, &user, id, input)
    })
    .await?;
    Ok(HttpResponse::Ok().json(review))
}

pub async fn delete_review(
    store: web::Data<Store>,
    auth: AuthUser,
    id: web::Path<i32>,
) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let review = with_conn(store, move |conn| {
        let user = current_user(conn, &auth)?;
        reviews::delete(conn, &user, id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(review))
}
