//! Keeps `products.rating` in line with the product's active reviews.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::debug;

use crate::db::schema::{products, reviews};

/// Arithmetic mean of the grades, `None` for an empty set.
pub fn mean_grade(grades: &[i32]) -> Option<f64> {
    if grades.is_empty() {
        return None;
    }
    let sum: i64 = grades.iter().map(|&g| i64::from(g)).sum();
    Some(sum as f64 / grades.len() as f64)
}

/// Recomputes the rating from scratch and writes it back.
///
/// Must run inside the transaction that changed the review set. The product id
/// is not checked: an unknown id updates zero rows.
pub fn recompute(conn: &mut SqliteConnection, product_id: i32) -> QueryResult<Option<f64>> {
    let grades: Vec<i32> = reviews::table
        .filter(reviews::product_id.eq(product_id))
        .filter(reviews::is_active.eq(true))
        .select(reviews::grade)
        .load(conn)?;

    let rating = mean_grade(&grades);
    diesel::update(products::table.filter(products::id.eq(product_id)))
        .set(products::rating.eq(rating))
        .execute(conn)?;

    debug!(product_id, reviews = grades.len(), ?rating, "rating recomputed");
    Ok(rating)
}
