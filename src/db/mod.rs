pub mod active;
pub mod connection;
pub mod models;
pub mod schema;

pub use connection::{DbConnection, Store};
pub use models::*;
