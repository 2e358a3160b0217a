//! Trending search store for moviedex.
//!
//! Uses `rusqlite` (bundled `SQLite`) to persist per-term search
//! counters with a representative movie snapshot.

mod connection;
mod migrations;
/// Trending counter CRUD operations.
pub mod trending;

#[allow(clippy::module_name_repetitions)]
pub use connection::open_db;
pub use rusqlite::Connection;
#[allow(clippy::module_name_repetitions)]
pub use trending::{MovieSnapshot, TrendingEntry, load_top, record_search};
