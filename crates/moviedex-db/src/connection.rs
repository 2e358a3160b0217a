//! Trending store location and opening.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// File name of the trending store inside its directory.
const STORE_FILE: &str = "moviedex.db";

/// Opens the trending store, creating the file and schema on first use.
///
/// With `dir` the store lives at `{dir}/moviedex.db` (tests and the
/// `--dir` flag); otherwise under the user's XDG data directory,
/// `~/.local/share/moviedex/`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the file cannot
/// be opened, or the schema migration fails.
pub fn open_db(dir: Option<&PathBuf>) -> Result<Connection> {
    let store_dir = match dir {
        Some(d) => d.clone(),
        None => default_store_dir()?,
    };

    std::fs::create_dir_all(&store_dir)
        .with_context(|| format!("failed to create directory {}", store_dir.display()))?;

    let store_path = store_dir.join(STORE_FILE);
    tracing::debug!(path = %store_path.display(), "opening trending store");

    let conn = Connection::open(&store_path)
        .with_context(|| format!("failed to open trending store {}", store_path.display()))?;

    run_migrations(&conn).context("trending store migration failed")?;

    Ok(conn)
}

/// `~/.local/share/moviedex`.
fn default_store_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok([home.as_str(), ".local", "share", "moviedex"].iter().collect())
}
