use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::info;
use validator::Validate;

use crate::db::active;
use crate::db::models::{Category, NewProduct, Product};
use crate::db::schema::products;
use crate::error::{ShopError, ShopResult};

pub fn list_active(conn: &mut SqliteConnection) -> ShopResult<Vec<Product>> {
    active::list(conn)
}

pub fn list_by_category(conn: &mut SqliteConnection, category_id: i32) -> ShopResult<Vec<Product>> {
    let category: Category = active::fetch(conn, category_id)?;
    Ok(products::table
        .filter(products::category_id.eq(category.id))
        .filter(products::is_active.eq(true))
        .order(products::id.asc())
        .select(Product::as_select())
        .load(conn)?)
}

pub fn get(conn: &mut SqliteConnection, id: i32) -> ShopResult<Product> {
    active::fetch(conn, id)
}

pub fn create(conn: &mut SqliteConnection, input: NewProduct) -> ShopResult<Product> {
    input.validate()?;
    conn.transaction::<_, ShopError, _>(|conn| {
        active::reference::<Category>(conn, input.category_id, "Category")?;
        let product: Product = diesel::insert_into(products::table)
            .values(&input)
            .returning(Product::as_returning())
            .get_result(conn)?;
        info!(product_id = product.id, category_id = product.category_id, "product created");
        Ok(product)
    })
}

/// Full replace of the mutable fields. The rating is derived and untouched.
pub fn update(conn: &mut SqliteConnection, id: i32, input: NewProduct) -> ShopResult<Product> {
    input.validate()?;
    conn.transaction::<_, ShopError, _>(|conn| {
        active::fetch::<Product>(conn, id)?;
        active::reference::<Category>(conn, input.category_id, "Category")?;
        let product: Product = diesel::update(products::table.find(id))
            .set(&input)
            .returning(Product::as_returning())
            .get_result(conn)?;
        info!(product_id = id, "product updated");
        Ok(product)
    })
}

pub fn delete(conn: &mut SqliteConnection, id: i32) -> ShopResult<Product> {
    let product = active::retire::<Product>(conn, id)?;
    info!(product_id = id, "product marked inactive");
    Ok(product)
}
