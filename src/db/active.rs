//! The active-only policy shared by every resource.
//!
//! An inactive row keeps its id and history but is treated as nonexistent by
//! reads and by foreign-key checks. Every service goes through the functions
//! here instead of filtering on `is_active` itself.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::db::models::{Category, Product, Review, User};
use crate::error::{ShopError, ShopResult};

pub trait SoftDelete: Sized {
    const ENTITY: &'static str;

    fn find_active(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Self>>;

    fn list_active(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>>;

    /// Flips `is_active` to false if the row is still active and returns it.
    fn deactivate(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Self>>;
}

macro_rules! soft_delete {
    ($model:ty, $table:ident, $entity:literal) => {
        impl SoftDelete for $model {
            const ENTITY: &'static str = $entity;

            fn find_active(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Self>> {
                use crate::db::schema::$table;

                $table::table
                    .filter($table::id.eq(id))
                    .filter($table::is_active.eq(true))
                    .select(<$model>::as_select())
                    .first(conn)
                    .optional()
            }

            fn list_active(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
                use crate::db::schema::$table;

                $table::table
                    .filter($table::is_active.eq(true))
                    .order($table::id.asc())
                    .select(<$model>::as_select())
                    .load(conn)
            }

            fn deactivate(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Self>> {
                use crate::db::schema::$table;

                diesel::update(
                    $table::table
                        .filter($table::id.eq(id))
                        .filter($table::is_active.eq(true)),
                )
                .set($table::is_active.eq(false))
                .returning(<$model>::as_returning())
                .get_result(conn)
                .optional()
            }
        }
    };
}

soft_delete!(Category, categories, "Category");
soft_delete!(Product, products, "Product");
soft_delete!(Review, reviews, "Review");
soft_delete!(User, users, "User");

/// Active row by id, or `NotFound`.
pub fn fetch<T: SoftDelete>(conn: &mut SqliteConnection, id: i32) -> ShopResult<T> {
    T::find_active(conn, id)?.ok_or(ShopError::NotFound { entity: T::ENTITY })
}

/// Active row that another row is about to point at, or `PreconditionFailed`.
pub fn reference<T: SoftDelete>(
    conn: &mut SqliteConnection,
    id: i32,
    label: &str,
) -> ShopResult<T> {
    T::find_active(conn, id)?
        .ok_or_else(|| ShopError::precondition(format!("{label} not found or inactive")))
}

/// Active -> Inactive. There is no way back.
pub fn retire<T: SoftDelete>(conn: &mut SqliteConnection, id: i32) -> ShopResult<T> {
    T::deactivate(conn, id)?.ok_or(ShopError::NotFound { entity: T::ENTITY })
}

pub fn list<T: SoftDelete>(conn: &mut SqliteConnection) -> ShopResult<Vec<T>> {
    Ok(T::list_active(conn)?)
}
