#![allow(dead_code)]

use std::time::Duration;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use ecommerce_backend::auth;
use ecommerce_backend::config::{AuthSettings, DatabaseSettings};
use ecommerce_backend::db::connection::{configure, run_migrations};
use ecommerce_backend::db::models::{
    Category, NewCategory, NewProduct, NewUser, Product, Role, User,
};
use ecommerce_backend::db::schema::users;
use ecommerce_backend::db::Store;
use ecommerce_backend::services::{categories, products};

/// bcrypt's minimum cost; the crate keeps its own `MIN_COST` private.
const BCRYPT_MIN_COST: u32 = 4;

/// Fresh in-memory database with the schema applied.
pub fn setup() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    configure(&mut conn, Duration::from_secs(1)).unwrap();
    run_migrations(&mut conn).unwrap();
    conn
}

/// File-backed store in a temp dir, for tests that go through the pool.
pub fn temp_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.db");
    let store = Store::open(&DatabaseSettings {
        url: path.to_str().unwrap().to_string(),
        pool_size: 4,
        busy_timeout_ms: 5000,
    })
    .unwrap();
    (dir, store)
}

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: "integration-secret".into(),
        token_ttl_minutes: 10,
        bcrypt_cost: BCRYPT_MIN_COST,
    }
}

pub fn user(conn: &mut SqliteConnection, email: &str, role: Role) -> User {
    insert_user(conn, email, "not-a-real-hash".into(), role)
}

/// Like `user`, but with a real hash so the account can log in.
pub fn user_with_password(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    role: Role,
) -> User {
    let hashed_password = auth::hash_password(password, BCRYPT_MIN_COST).unwrap();
    insert_user(conn, email, hashed_password, role)
}

fn insert_user(
    conn: &mut SqliteConnection,
    email: &str,
    hashed_password: String,
    role: Role,
) -> User {
    diesel::insert_into(users::table)
        .values(NewUser {
            email: email.into(),
            hashed_password,
            role,
        })
        .returning(User::as_returning())
        .get_result(conn)
        .unwrap()
}

pub fn category(conn: &mut SqliteConnection, name: &str, parent_id: Option<i32>) -> Category {
    categories::create(
        conn,
        NewCategory {
            name: name.into(),
            parent_id,
        },
    )
    .unwrap()
}

pub fn product_input(name: &str, category_id: i32) -> NewProduct {
    NewProduct {
        name: name.into(),
        description: Some("test product".into()),
        price: 19.99,
        image_url: None,
        stock: 10,
        category_id,
    }
}

pub fn product(conn: &mut SqliteConnection, name: &str, category_id: i32) -> Product {
    products::create(conn, product_input(name, category_id)).unwrap()
}
