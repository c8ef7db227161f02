//! recordx Store - SQLite reference persistence for the harness
//!
//! Provides:
//! - Connection management and an embedded, checksummed migration runner
//! - `SqliteRepo` for typed records with JSON attribute values
//! - `SqliteRecord` (an `Entity`) and `SqlitePersistence` (a `Persistence`)
//!   so the matchers can run against a real database

pub mod db;
pub mod entity;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use entity::{SqlitePersistence, SqliteRecord};
pub use errors::Result;
pub use repo::SqliteRepo;
