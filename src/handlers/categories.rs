use actix_web::{web, HttpResponse};
use tracing::debug;

use crate::db::models::NewCategory;
use crate::db::Store;
use crate::error::ShopResult;
use crate::handlers::with_conn;
use crate::services::categories;

pub async fn list_categories(store: web::Data<Store>) -> ShopResult<HttpResponse> {
    let found = with_conn(store, categories::list_active).await?;
    debug!("Retrieved {} categories", found.len());
    Ok(HttpResponse::Ok().json(found))
}

pub async fn get_category(store: web::Data<Store>, id: web::Path<i32>) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let category = with_conn(store, move |conn| categories::get(conn, id)).await?;
    Ok(HttpResponse::Ok().json(category))
}

pub async fn get_children(store: web::Data<Store>, id: web::Path<i32>) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let children = with_conn(store, move |conn| categories::children(conn, id)).await?;
    Ok(HttpResponse::Ok().json(children))
}

pub async fn create_category(
    store: web::Data<Store>,
    category: web::Json<NewCategory>,
) -> ShopResult<HttpResponse> {
    let input = category.into_inner();
    let category = with_conn(store, move |conn| categories::create(conn, input)).await?;
    Ok(HttpResponse::Created().json(category))
}

pub async fn update_category(
    store: web::Data<Store>,
    id: web::Path<i32>,
    category: web::Json<NewCategory>,
) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let input = category.into_inner();
    let category = with_conn(store, move |conn| categories::update(conn, id, input)).await?;
    Ok(HttpResponse::Ok().json(category))
}

pub async fn delete_category(
    store: web::Data<Store>,
    id: web::Path<i32>,
) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let category = with_conn(store, move |conn| categories::delete(conn, id)).await?;
    Ok(HttpResponse::Ok().json(category))
}
