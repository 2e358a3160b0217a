//! Background fetch worker thread.
//!
//! The event loop stays synchronous; catalog requests run on a worker
//! thread that owns the HTTP client, the trending store connection, and
//! a small single-threaded tokio runtime.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use moviedex_api::tmdb::{LocalCatalogApi, Movie, TmdbClient};
use moviedex_db::{Connection, MovieSnapshot, record_search};

/// A fetch dispatched by the event loop.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Request token; outcomes for superseded tokens are dropped.
    pub id: u64,
    /// The committed query ("" means discovery feed).
    pub query: String,
}

/// A fetch completion sent back to the event loop.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Token of the originating request.
    pub id: u64,
    /// Results, or the user-visible error message.
    pub result: Result<Vec<Movie>, String>,
}

/// Returns the trending snapshot to record for a settled fetch:
/// only a non-empty search that yielded at least one result records.
fn snapshot_for(query: &str, results: &[Movie]) -> Option<MovieSnapshot> {
    if query.trim().is_empty() {
        return None;
    }
    results.first().map(|movie| MovieSnapshot {
        movie_id: movie.id,
        movie_title: movie.title.clone(),
        poster_path: movie.poster_path.clone(),
    })
}

/// Spawns the fetch worker thread.
///
/// The worker exits when the request channel closes. Trending upserts are
/// best-effort: a store failure is logged and never alters the fetch
/// outcome.
pub fn spawn_worker(
    client: TmdbClient,
    store: Option<Connection>,
    language: String,
    request_rx: Receiver<FetchRequest>,
    outcome_tx: Sender<FetchOutcome>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!(error = %e, "failed to build worker runtime");
                return;
            }
        };

        while let Ok(request) = request_rx.recv() {
            let outcome = match runtime.block_on(client.fetch(&request.query, &language)) {
                Ok(response) => {
                    if let Some(snapshot) = snapshot_for(&request.query, &response.results) {
                        record_trending(store.as_ref(), &request.query, &snapshot);
                    }
                    Ok(response.results)
                }
                Err(e) => {
                    tracing::warn!(error = %e, query = %request.query, "catalog fetch failed");
                    Err(String::from(e.user_message()))
                }
            };

            let _ = outcome_tx.send(FetchOutcome {
                id: request.id,
                result: outcome,
            });
        }
    })
}

/// Best-effort trending upsert; failures are logged only.
fn record_trending(store: Option<&Connection>, term: &str, snapshot: &MovieSnapshot) {
    let Some(conn) = store else {
        tracing::debug!("trending store unavailable, skipping record");
        return;
    };
    if let Err(e) = record_search(conn, term, snapshot) {
        tracing::warn!(error = %e, term, "failed to record trending search");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use moviedex_db::{load_top, open_db};

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: String::from(title),
            original_title: String::from(title),
            original_language: String::from("en"),
            release_date: Some(String::from("2021-09-15")),
            overview: None,
            popularity: 93.282,
            vote_average: 7.787,
            vote_count: 12_453,
            genre_ids: vec![878],
            adult: false,
            video: false,
            poster_path: Some(String::from("/poster.jpg")),
            backdrop_path: None,
        }
    }

    #[test]
    fn test_snapshot_for_non_empty_search_with_results() {
        // Arrange
        let results = vec![movie(438_631, "Dune"), movie(693_134, "Dune: Part Two")];

        // Act
        let snapshot = snapshot_for("dune", &results).unwrap();

        // Assert: first result wins
        assert_eq!(snapshot.movie_id, 438_631);
        assert_eq!(snapshot.movie_title, "Dune");
    }

    #[test]
    fn test_snapshot_for_empty_query_records_nothing() {
        // Arrange
        let results = vec![movie(438_631, "Dune")];

        // Assert
        assert!(snapshot_for("", &results).is_none());
        assert!(snapshot_for("   ", &results).is_none());
    }

    #[test]
    fn test_snapshot_for_zero_results_records_nothing() {
        // Assert
        assert!(snapshot_for("dune", &[]).is_none());
    }

    fn start_worker_against(
        mock_uri: &str,
        store: Option<Connection>,
    ) -> (mpsc::Sender<FetchRequest>, mpsc::Receiver<FetchOutcome>) {
        let base_url = format!("{mock_uri}/3/");
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap();

        let (request_tx, request_rx) = mpsc::channel();
        let (outcome_tx, outcome_rx) = mpsc::channel();
        spawn_worker(
            client,
            store,
            String::from("en-US"),
            request_rx,
            outcome_tx,
        );
        (request_tx, outcome_rx)
    }

    /// Receives one outcome without blocking the test runtime (the mock
    /// server task must keep running while we wait).
    async fn recv_outcome(outcome_rx: mpsc::Receiver<FetchOutcome>) -> FetchOutcome {
        tokio::task::spawn_blocking(move || outcome_rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_successful_search_records_exactly_one_upsert() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_dune.json");
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_path_buf();
        let store = open_db(Some(&dir_path)).unwrap();
        let (request_tx, outcome_rx) = start_worker_against(&mock_server.uri(), Some(store));

        // Act
        request_tx
            .send(FetchRequest {
                id: 1,
                query: String::from("dune"),
            })
            .unwrap();
        let outcome = recv_outcome(outcome_rx).await;

        // Assert
        assert_eq!(outcome.id, 1);
        assert!(!outcome.result.unwrap().is_empty());
        let check = open_db(Some(&dir_path)).unwrap();
        let entries = load_top(&check, 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].search_term, "dune");
        assert_eq!(entries[0].count, 1);
        assert_eq!(entries[0].movie_id, 438_631);
    }

    #[tokio::test]
    async fn test_failed_fetch_records_nothing() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_path_buf();
        let store = open_db(Some(&dir_path)).unwrap();
        let (request_tx, outcome_rx) = start_worker_against(&mock_server.uri(), Some(store));

        // Act
        request_tx
            .send(FetchRequest {
                id: 7,
                query: String::from("dune"),
            })
            .unwrap();
        let outcome = recv_outcome(outcome_rx).await;

        // Assert: transport failure surfaces the generic message, no upsert
        assert_eq!(outcome.result.unwrap_err(), "Something went wrong.");
        let check = open_db(Some(&dir_path)).unwrap();
        assert!(load_top(&check, 10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_does_not_fail_the_fetch() {
        // Arrange: store without schema so the upsert fails
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_dune.json");
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let broken = Connection::open_in_memory().unwrap();
        let (request_tx, outcome_rx) = start_worker_against(&mock_server.uri(), Some(broken));

        // Act
        request_tx
            .send(FetchRequest {
                id: 2,
                query: String::from("dune"),
            })
            .unwrap();
        let outcome = recv_outcome(outcome_rx).await;

        // Assert: fetch still succeeds
        assert!(outcome.result.is_ok());
    }
}
