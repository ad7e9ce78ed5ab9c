//! cuba-adapter-sqlite - SQLite 适配器

mod connection;

pub use connection::*;
