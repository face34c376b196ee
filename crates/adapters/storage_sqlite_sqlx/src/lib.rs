//! # emuhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using `sqlx`.
//!
//! ## Responsibilities
//! - Manage the connection pool and run embedded migrations
//! - Implement the `ReadingStore` port: insert readings, serve recent
//!   history newest first, answer health pings
//!
//! ## Dependency rule
//! Depends on `emuhub-app` (port traits) and `emuhub-domain` only.

mod error;
mod pool;
mod reading_store;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use reading_store::SqliteReadingStore;
