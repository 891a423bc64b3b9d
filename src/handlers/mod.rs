use actix_web::web;
use diesel::sqlite::SqliteConnection;

use crate::db::Store;
use crate::error::ShopResult;

pub mod categories;
pub mod products;
pub mod reviews;
pub mod users;

/// Runs blocking store work on the actix thread pool with a pooled connection.
pub(crate) async fn with_conn<T, F>(store: web::Data<Store>, f: F) -> ShopResult<T>
where
    F: FnOnce(&mut SqliteConnection) -> ShopResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || {
        let mut conn = store.conn()?;
        f(&mut conn)
    })
    .await?
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(categories::list_categories))
            .route("", web::post().to(categories::create_category))
            .route("/{id}", web::get().to(categories::get_category))
            .route("/{id}/children", web::get().to(categories::get_children))
            .route("/{id}", web::put().to(categories::update_category))
            .route("/{id}", web::delete().to(categories::delete_category)),
    )
    .service(
        web::scope("/products")
            .route("", web::get().to(products::list_products))
            .route("", web::post().to(products::create_product))
            .route(
                "/category/{category_id}",
                web::get().to(products::get_products_by_category),
            )
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}/reviews", web::get().to(reviews::get_product_reviews))
            .route("/{id}", web::put().to(products::update_product))
            .route("/{id}", web::delete().to(products::delete_product)),
    )
    .service(
        web::scope("/reviews")
            .route("", web::get().to(reviews::list_reviews))
            .route("", web::post().to(reviews::create_review))
            .route("/{id}", web::get().to(reviews::get_review))
            .route("/{id}", web::put().to(reviews::update_review))
            .route("/{id}", web::delete().to(reviews::delete_review)),
    )
    .service(
        web::scope("/users")
            .route("", web::post().to(users::register))
            .route("/token", web::post().to(users::login))
            .route("/admins", web::post().to(users::create_admin))
            .route("/{id}", web::delete().to(users::deactivate_user)),
    );
}
