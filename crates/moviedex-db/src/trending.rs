//! Trending counter CRUD operations.

use anyhow::{Context, Result, ensure};
use chrono::Utc;
use rusqlite::Connection;

/// Representative movie snapshot attached to a trending entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSnapshot {
    /// TMDB movie ID.
    pub movie_id: u64,
    /// Movie title at the time of the search.
    pub movie_title: String,
    /// Poster image path (nullable).
    pub poster_path: Option<String>,
}

/// A persisted search-term counter.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingEntry {
    /// The search term (unique key).
    pub search_term: String,
    /// Number of successful searches for this term.
    pub count: u64,
    /// TMDB ID of the representative movie.
    pub movie_id: u64,
    /// Title of the representative movie.
    pub movie_title: String,
    /// Poster path of the representative movie (nullable).
    pub poster_path: Option<String>,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

/// Records a successful search: creates the counter at 1 or increments it,
/// refreshing the representative movie snapshot either way.
///
/// The term is stored trimmed. Entries are never deleted.
///
/// # Errors
///
/// Returns an error if the term is empty after trimming or the database
/// operation fails.
#[allow(clippy::module_name_repetitions)]
pub fn record_search(conn: &Connection, term: &str, snapshot: &MovieSnapshot) -> Result<()> {
    let term = term.trim();
    ensure!(!term.is_empty(), "search term must not be empty");

    let updated_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO trending_searches (
            search_term, count, movie_id, movie_title, poster_path, updated_at
        ) VALUES (?1, 1, ?2, ?3, ?4, ?5)
        ON CONFLICT(search_term) DO UPDATE SET
            count = count + 1,
            movie_id = excluded.movie_id,
            movie_title = excluded.movie_title,
            poster_path = excluded.poster_path,
            updated_at = excluded.updated_at",
        rusqlite::params![
            term,
            snapshot.movie_id,
            snapshot.movie_title,
            snapshot.poster_path,
            updated_at,
        ],
    )
    .with_context(|| format!("failed to record search for term {term:?}"))?;

    Ok(())
}

/// Loads the top trending entries ordered by descending count.
///
/// Equal counts tie-break on ascending term for deterministic ordering.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_top(conn: &Connection, limit: usize) -> Result<Vec<TrendingEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT search_term, count, movie_id, movie_title, poster_path, updated_at
             FROM trending_searches
             ORDER BY count DESC, search_term ASC
             LIMIT ?1",
        )
        .context("failed to prepare trending query")?;

    let entries = stmt
        .query_map([limit], |row| {
            Ok(TrendingEntry {
                search_term: row.get(0)?,
                count: row.get(1)?,
                movie_id: row.get(2)?,
                movie_title: row.get(3)?,
                poster_path: row.get(4)?,
                updated_at: row.get(5)?,
            })
        })
        .context("failed to query trending entries")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read trending row")?;

    Ok(entries)
}
