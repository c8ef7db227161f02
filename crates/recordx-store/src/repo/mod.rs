//! Repository layer for typed records stored as JSON attribute maps

pub mod sqlite_repo;

pub use sqlite_repo::{Attributes, SqliteRepo};
