//! Backend for a small shop: categories, products and reviews over SQLite,
//! with soft delete and a product rating derived from active reviews.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod rating;
pub mod services;
pub mod telemetry;

pub use error::{ShopError, ShopResult};
