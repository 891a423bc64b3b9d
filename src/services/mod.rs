//! Resource services. Each operation checks its preconditions against the
//! store before writing, and every write happens inside one transaction.

pub mod categories;
pub mod products;
pub mod reviews;
pub mod users;
