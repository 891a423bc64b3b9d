use actix_web::{web, HttpResponse};

use crate::auth::{current_user, AuthUser};
use crate::config::AuthSettings;
use crate::db::models::{LoginRequest, RegisterRequest};
use crate::db::Store;
use crate::error::ShopResult;
use crate::handlers::with_conn;
use crate::services::users;

pub async fn register(
    store: web::Data<Store>,
    settings: web::Data<AuthSettings>,
    req: web::Json<RegisterRequest>,
) -> ShopResult<HttpResponse> {
    let input = req.into_inner();
    let user = with_conn(store, move |conn| users::register(conn, &settings, input)).await?;
    Ok(HttpResponse::Created().json(user))
}

pub async fn create_admin(
    store: web::Data<Store>,
    settings: web::Data<AuthSettings>,
    auth: AuthUser,
    req: web::Json<RegisterRequest>,
) -> ShopResult<HttpResponse> {
    let input = req.into_inner();
    let user = with_conn(store, move |conn| {
        let admin = current_user(conn, &auth)?;
        users::create_admin(conn, &settings, &admin, input)
    })
    .await?;
    Ok(HttpResponse::Created().json(user))
}

pub async fn login(
    store: web::Data<Store>,
    settings: web::Data<AuthSettings>,
    req: web::Json<LoginRequest>,
) -> ShopResult<HttpResponse> {
    let LoginRequest { email, password } = req.into_inner();
    let token = with_conn(store, move |conn| {
        users::login(conn, &settings, &email, &password)
    })
    .await?;
    Ok(HttpResponse::Ok().json(token))
}

pub async fn deactivate_user(
    store: web::Data<Store>,
    auth: AuthUser,
    id: web::Path<i32>,
) -> ShopResult<HttpResponse> {
    let id = id.into_inner();
    let user = with_conn(store, move |conn| {
        let admin = current_user(conn, &auth)?;
        users::deactivate(conn, &admin, id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(user))
}
