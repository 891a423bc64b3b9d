//! Review lifecycle. Every mutation recomputes the product rating before its
//! transaction commits, so no reader sees a review change without the rating
//! that goes with it.
//!
//! Review writes use an IMMEDIATE transaction: SQLite takes the write lock up
//! front, so two aggregations for the same product cannot interleave their
//! read and write.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::info;
use validator::Validate;

use crate::db::active;
use crate::db::models::{NewReview, Product, Review, ReviewCreate, ReviewUpdate, Role, User};
use crate::db::schema::reviews;
use crate::error::{ShopError, ShopResult};
use crate::rating;

pub fn list_active(conn: &mut SqliteConnection) -> ShopResult<Vec<Review>> {
    active::list(conn)
}

pub fn list_for_product(conn: &mut SqliteConnection, product_id: i32) -> ShopResult<Vec<Review>> {
    let product: Product = active::fetch(conn, product_id)?;
    Ok(Review::belonging_to(&product)
        .filter(reviews::is_active.eq(true))
        .order(reviews::comment_date.desc())
        .select(Review::as_select())
        .load(conn)?)
}

pub fn get(conn: &mut SqliteConnection, id: i32) -> ShopResult<Review> {
    active::fetch(conn, id)
}

/// Buyers only. The author is always the acting user.
pub fn create(
    conn: &mut SqliteConnection,
    actor: &User,
    input: ReviewCreate,
) -> ShopResult<Review> {
    actor.require_role(Role::Buyer)?;
    input.validate()?;
    conn.immediate_transaction::<_, ShopError, _>(|conn| {
        active::reference::<Product>(conn, input.product_id, "Product")?;
        let review: Review = diesel::insert_into(reviews::table)
            .values(NewReview {
                user_id: actor.id,
                product_id: input.product_id,
                comment: input.comment,
                comment_date: Utc::now().naive_utc(),
                grade: input.grade,
            })
            .returning(Review::as_returning())
            .get_result(conn)?;
        let rating = rating::recompute(conn, review.product_id)?;
        info!(
            review_id = review.id,
            product_id = review.product_id,
            user_id = actor.id,
            ?rating,
            "review created"
        );
        Ok(review)
    })
}

/// The author replaces comment and grade of their own active review.
pub fn update(
    conn: &mut SqliteConnection,
    actor: &User,
    id: i32,
    input: ReviewUpdate,
) -> ShopResult<Review> {
    actor.require_role(Role::Buyer)?;
    input.validate()?;
    conn.immediate_transaction::<_, ShopError, _>(|conn| {
        let existing: Review = active::fetch(conn, id)?;
        if existing.user_id != actor.id {
            return Err(ShopError::forbidden("Only the author may edit a review"));
        }
        let review: Review = diesel::update(reviews::table.find(id))
            .set(&input)
            .returning(Review::as_returning())
            .get_result(conn)?;
        let rating = rating::recompute(conn, review.product_id)?;
        info!(review_id = id, product_id = review.product_id, ?rating, "review updated");
        Ok(review)
    })
}

/// Admins only. Removing the last active review leaves the rating unset.
pub fn delete(conn: &mut SqliteConnection, actor: &User, id: i32) -> ShopResult<Review> {
    actor.require_role(Role::Admin)?;
    conn.immediate_transaction::<_, ShopError, _>(|conn| {
        let review = active::retire::<Review>(conn, id)?;
        let rating = rating::recompute(conn, review.product_id)?;
        info!(review_id = id, product_id = review.product_id, ?rating, "review marked inactive");
        Ok(review)
    })
}
