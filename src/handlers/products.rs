use actix_web::{web, HttpResponse};
use tracing::debug;

use crate::db::models::NewProduct;
use crate::db::Store;
use crate::error::ShopResult;
use crate::handlers::with_conn;
use crate::services::products;

pub async fn list_products(store: web::Data<Store>) -> ShopResult<HttpResponse> {
    let found = with_conn(store, products::list_active).await?;
    debug!("Retrieved {} products", found.len());
    Ok(HttpResponse::Ok().json(found))
}

pub async fn get_products_by_category(
    store: web::Data<Store>,
    category_id: web::Path<i32>,
) -> ShopResult<HttpResponse> {
    let category_id = category_id.into_inner();
    let found = with_conn(store, move |conn| {
        products::list_by_category(conn, category_id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn get_product(store: web::Data<Store>, id: web::Path<i32>) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let product = with_conn(store, move |conn| products::get(conn, id)).await?;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn create_product(
    store: web::Data<Store>,
    product: web::Json<NewProduct>,
) -> ShopResult<HttpResponse> {
    let input = product.into_inner();
    let product = with_conn(store, move |conn| products::create(conn, input)).await?;
    Ok(HttpResponse::Created().json(product))
}

pub async fn update_product(
    store: web::Data<Store>,
    id: web::Path<i32>,
    product: web::Json<NewProduct>,
) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let input = product.into_inner();
    let product = with_conn(store, move |conn| products::update(conn, id, input)).await?;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn delete_product(
    store: web::Data<Store>,
    id: web::Path<i32>,
) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let product = with_conn(store, move |conn| products::delete(conn, id)).await?;
    Ok(HttpResponse::Ok().json(product))
}
