use std::collections::HashSet;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::info;
use validator::Validate;

use crate::db::active;
use crate::db::models::{Category, NewCategory};
use crate::db::schema::categories;
use crate::error::{ShopError, ShopResult};

pub fn list_active(conn: &mut SqliteConnection) -> ShopResult<Vec<Category>> {
    active::list(conn)
}

pub fn get(conn: &mut SqliteConnection, id: i32) -> ShopResult<Category> {
    active::fetch(conn, id)
}

/// Active direct children of an active category.
pub fn children(conn: &mut SqliteConnection, id: i32) -> ShopResult<Vec<Category>> {
    let parent: Category = active::fetch(conn, id)?;
    Ok(categories::table
        .filter(categories::parent_id.eq(parent.id))
        .filter(categories::is_active.eq(true))
        .order(categories::id.asc())
        .select(Category::as_select())
        .load(conn)?)
}

pub fn create(conn: &mut SqliteConnection, input: NewCategory) -> ShopResult<Category> {
    input.validate()?;
    conn.transaction::<_, ShopError, _>(|conn| {
        if let Some(parent_id) = input.parent_id {
            active::reference::<Category>(conn, parent_id, "Parent category")?;
        }
        let category: Category = diesel::insert_into(categories::table)
            .values(&input)
            .returning(Category::as_returning())
            .get_result(conn)?;
        info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    })
}

/// Replaces name and parent of an active category.
pub fn update(conn: &mut SqliteConnection, id: i32, input: NewCategory) -> ShopResult<Category> {
    input.validate()?;
    conn.transaction::<_, ShopError, _>(|conn| {
        active::fetch::<Category>(conn, id)?;
        if let Some(parent_id) = input.parent_id {
            active::reference::<Category>(conn, parent_id, "Parent category")?;
            ensure_not_ancestor(conn, id, parent_id)?;
        }
        let category: Category = diesel::update(categories::table.find(id))
            .set(&input)
            .returning(Category::as_returning())
            .get_result(conn)?;
        info!(category_id = id, "category updated");
        Ok(category)
    })
}

pub fn delete(conn: &mut SqliteConnection, id: i32) -> ShopResult<Category> {
    let category = active::retire::<Category>(conn, id)?;
    info!(category_id = id, "category marked inactive");
    Ok(category)
}

/// Walks up from `parent_id` and fails if `id` shows up among its ancestors.
/// The visited set stops the walk on a loop that predates this check.
fn ensure_not_ancestor(conn: &mut SqliteConnection, id: i32, parent_id: i32) -> ShopResult<()> {
    let mut visited = HashSet::new();
    let mut cursor = Some(parent_id);
    while let Some(current) = cursor {
        if current == id {
            return Err(ShopError::precondition(
                "Category cannot be moved under itself or one of its descendants",
            ));
        }
        if !visited.insert(current) {
            break;
        }
        cursor = categories::table
            .find(current)
            .select(categories::parent_id)
            .first::<Option<i32>>(conn)
            .optional()?
            .flatten();
    }
    Ok(())
}
