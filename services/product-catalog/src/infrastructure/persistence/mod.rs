//! Persistence layer

mod rows;
mod schema;
mod sqlite;

pub use schema::{PRODUCTS_TABLE, ensure_schema};
pub use sqlite::SqliteProductRepository;
