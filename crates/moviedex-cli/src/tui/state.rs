//! Browser state management.

use std::time::{Duration, Instant};

use moviedex_api::tmdb::Movie;
use moviedex_db::TrendingEntry;

/// Delays propagation of raw input into a committed query.
///
/// `touch` arms (or re-arms) the quiescence window; `fire` reports once
/// that the window has elapsed since the last touch. Time is passed in
/// explicitly so the logic is testable without real timers.
#[derive(Debug)]
pub struct Debouncer {
    /// Quiescence window.
    window: Duration,
    /// Timestamp of the last input change, if an emission is pending.
    pending: Option<Instant>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiescence window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Records an input change, restarting the window.
    pub fn touch(&mut self, now: Instant) {
        self.pending = Some(now);
    }

    /// Returns `true` once when the input has been quiescent for the
    /// full window. No-op while the window is still running or when
    /// nothing is pending.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(last) if now.duration_since(last) >= self.window => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Cancels any pending emission.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns `true` if an emission is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Per-list view state: one fetch cycle moves `Loading` to either
/// `Success` or `Error`; a new cycle resets to `Loading`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// A fetch cycle is in flight.
    Loading,
    /// The cycle settled with results (possibly empty).
    Success(Vec<T>),
    /// The cycle settled with a user-visible error message.
    Error(String),
}

impl<T> FetchState<T> {
    /// Returns the items when in the `Success` state.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Success(items) => items,
            _ => &[],
        }
    }

    /// Returns `true` while a cycle is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// A movie row for display.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRow {
    /// TMDB movie ID.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Release year (from the release date).
    pub release_year: Option<String>,
    /// Vote average (0-10).
    pub vote_average: f64,
    /// Popularity score.
    pub popularity: f64,
    /// Overview text.
    pub overview: Option<String>,
}

impl From<&Movie> for MovieRow {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            release_year: movie
                .release_date
                .as_deref()
                .and_then(|d| d.get(..4))
                .map(String::from),
            vote_average: movie.vote_average,
            popularity: movie.popularity,
            overview: movie.overview.clone(),
        }
    }
}

/// A trending row for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingRow {
    /// The search term.
    pub search_term: String,
    /// Number of recorded searches.
    pub count: u64,
    /// Representative movie title.
    pub movie_title: String,
}

impl From<&TrendingEntry> for TrendingRow {
    fn from(entry: &TrendingEntry) -> Self {
        Self {
            search_term: entry.search_term.clone(),
            count: entry.count,
            movie_title: entry.movie_title.clone(),
        }
    }
}

/// State for the browser TUI.
///
/// Each dispatched fetch carries a monotonically increasing request id;
/// a completion for anything but the latest id is discarded, so a slow
/// stale response can never overwrite a newer one.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Raw search input (every keystroke).
    pub input: String,
    /// Last committed (debounced) query.
    pub committed_query: String,
    /// Debounce timer for the input.
    pub debounce: Debouncer,
    /// Main result list state.
    pub movies: FetchState<MovieRow>,
    /// Trending panel state.
    pub trending: FetchState<TrendingRow>,
    /// Cursor position in the movie list.
    pub cursor: usize,
    /// Id of the latest dispatched fetch.
    current_request_id: u64,
}

impl BrowserState {
    /// Creates a new state with the given debounce window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            input: String::new(),
            committed_query: String::new(),
            debounce: Debouncer::new(window),
            movies: FetchState::Loading,
            trending: FetchState::Loading,
            cursor: 0,
            current_request_id: 0,
        }
    }

    /// Appends a character to the input and re-arms the debouncer.
    pub fn input_push(&mut self, c: char, now: Instant) {
        self.input.push(c);
        self.debounce.touch(now);
    }

    /// Removes the last character from the input and re-arms the debouncer.
    pub fn input_pop(&mut self, now: Instant) {
        self.input.pop();
        self.debounce.touch(now);
    }

    /// Clears the input and re-arms the debouncer (will settle back to
    /// the discovery feed).
    pub fn input_clear(&mut self, now: Instant) {
        self.input.clear();
        self.debounce.touch(now);
    }

    /// Commits the current input immediately, starting a new fetch cycle.
    ///
    /// Returns the request id and the committed query to dispatch.
    pub fn commit_query(&mut self) -> (u64, String) {
        self.debounce.cancel();
        self.committed_query = String::from(self.input.trim());
        self.movies = FetchState::Loading;
        self.cursor = 0;
        self.current_request_id = self.current_request_id.wrapping_add(1);
        (self.current_request_id, self.committed_query.clone())
    }

    /// Commits the input if the debounce window has elapsed.
    ///
    /// Input that settled back to the already-committed query (typed
    /// then erased) commits nothing; only a changed value refetches.
    pub fn poll_commit(&mut self, now: Instant) -> Option<(u64, String)> {
        if !self.debounce.fire(now) {
            return None;
        }
        if self.input.trim() == self.committed_query {
            return None;
        }
        Some(self.commit_query())
    }

    /// Applies a fetch completion. Returns `false` when the completion
    /// belongs to a superseded request and was discarded.
    pub fn apply_outcome(&mut self, id: u64, result: Result<Vec<MovieRow>, String>) -> bool {
        if id != self.current_request_id {
            tracing::debug!(id, current = self.current_request_id, "stale fetch dropped");
            return false;
        }
        self.movies = match result {
            Ok(rows) => FetchState::Success(rows),
            Err(message) => FetchState::Error(message),
        };
        self.cursor = 0;
        true
    }

    /// Replaces the trending panel state.
    pub fn set_trending(&mut self, trending: FetchState<TrendingRow>) {
        self.trending = trending;
    }

    /// Moves the movie cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Moves the movie cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.movies.items().len() {
            self.cursor += 1;
        }
    }

    /// Returns the movie under the cursor, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&MovieRow> {
        self.movies.items().get(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    fn row(id: u64, title: &str) -> MovieRow {
        MovieRow {
            id,
            title: String::from(title),
            release_year: Some(String::from("2021")),
            vote_average: 7.8,
            popularity: 93.3,
            overview: None,
        }
    }

    #[test]
    fn test_debouncer_does_not_fire_within_window() {
        // Arrange
        let mut debounce = Debouncer::new(WINDOW);
        let t0 = Instant::now();

        // Act
        debounce.touch(t0);

        // Assert
        assert!(!debounce.fire(t0 + Duration::from_millis(499)));
        assert!(debounce.is_pending());
    }

    #[test]
    fn test_debouncer_fires_once_after_window() {
        // Arrange
        let mut debounce = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        debounce.touch(t0);

        // Act & Assert
        assert!(debounce.fire(t0 + Duration::from_millis(500)));
        assert!(!debounce.fire(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn test_debouncer_rearms_on_every_touch() {
        // Arrange
        let mut debounce = Debouncer::new(WINDOW);
        let t0 = Instant::now();

        // Act: three keystrokes, each within the window of the previous
        debounce.touch(t0);
        debounce.touch(t0 + Duration::from_millis(200));
        debounce.touch(t0 + Duration::from_millis(400));

        // Assert: window counts from the last touch
        assert!(!debounce.fire(t0 + Duration::from_millis(700)));
        assert!(debounce.fire(t0 + Duration::from_millis(900)));
    }

    #[test]
    fn test_debouncer_cancel_suppresses_emission() {
        // Arrange
        let mut debounce = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        debounce.touch(t0);

        // Act
        debounce.cancel();

        // Assert
        assert!(!debounce.fire(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_rapid_typing_commits_last_value_once() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);
        let t0 = Instant::now();

        // Act: type "dune" with under-window gaps
        state.input_push('d', t0);
        state.input_push('u', t0 + Duration::from_millis(100));
        state.input_push('n', t0 + Duration::from_millis(200));
        state.input_push('e', t0 + Duration::from_millis(300));

        // Assert: nothing commits until the window elapses from the last key
        assert!(state.poll_commit(t0 + Duration::from_millis(700)).is_none());
        let (_, query) = state.poll_commit(t0 + Duration::from_millis(800)).unwrap();
        assert_eq!(query, "dune");
        assert!(state.poll_commit(t0 + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_input_settling_back_to_committed_query_skips_commit() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);
        state.input = String::from("dune");
        let (id, _) = state.commit_query();
        state.apply_outcome(id, Ok(vec![row(1, "Dune")]));

        // Act: type a char and erase it, then let the window elapse
        let t0 = Instant::now();
        state.input_push('s', t0);
        state.input_pop(t0 + Duration::from_millis(100));

        // Assert: the settled value matches the committed one, no refetch
        assert!(state.poll_commit(t0 + Duration::from_secs(1)).is_none());
        assert_eq!(state.movies.items().len(), 1);
    }

    #[test]
    fn test_whitespace_settling_on_empty_committed_skips_commit() {
        // Arrange: fresh state, committed query is the discovery feed
        let mut state = BrowserState::new(WINDOW);
        let t0 = Instant::now();

        // Act: type spaces only
        state.input_push(' ', t0);
        state.input_push(' ', t0 + Duration::from_millis(50));

        // Assert
        assert!(state.poll_commit(t0 + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_changed_input_still_commits_after_window() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);
        state.input = String::from("dune");
        state.commit_query();

        // Act
        let t0 = Instant::now();
        state.input_push('s', t0);

        // Assert
        let (_, query) = state.poll_commit(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(query, "dunes");
    }

    #[test]
    fn test_commit_trims_and_starts_loading() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);
        state.movies = FetchState::Error(String::from("old error"));
        state.input = String::from("  dune ");

        // Act
        let (id, query) = state.commit_query();

        // Assert
        assert_eq!(query, "dune");
        assert_eq!(state.committed_query, "dune");
        assert!(state.movies.is_loading());
        assert_eq!(id, 1);
    }

    #[test]
    fn test_apply_outcome_success() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);
        let (id, _) = state.commit_query();

        // Act
        let applied = state.apply_outcome(id, Ok(vec![row(1, "Dune")]));

        // Assert
        assert!(applied);
        assert_eq!(state.movies.items().len(), 1);
        assert_eq!(state.selected().unwrap().title, "Dune");
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);
        let (stale_id, _) = state.commit_query();
        let (_, _) = state.commit_query();

        // Act: slow response to the earlier query arrives last
        let applied = state.apply_outcome(stale_id, Ok(vec![row(1, "Old")]));

        // Assert: newer cycle still loading, stale results dropped
        assert!(!applied);
        assert!(state.movies.is_loading());
    }

    #[test]
    fn test_apply_outcome_error() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);
        let (id, _) = state.commit_query();

        // Act
        state.apply_outcome(id, Err(String::from("Something went wrong.")));

        // Assert
        assert_eq!(
            state.movies,
            FetchState::Error(String::from("Something went wrong."))
        );
    }

    #[test]
    fn test_new_cycle_resets_error_to_loading() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);
        let (id, _) = state.commit_query();
        state.apply_outcome(id, Err(String::from("Something went wrong.")));

        // Act
        state.commit_query();

        // Assert: loading takes priority over the stale error
        assert!(state.movies.is_loading());
    }

    #[test]
    fn test_trending_state_is_independent() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);

        // Act: trending load fails while the main list settles normally
        state.set_trending(FetchState::Error(String::from(
            "Error fetching trending movies",
        )));
        let (id, _) = state.commit_query();
        state.apply_outcome(id, Ok(vec![row(1, "Dune")]));

        // Assert
        assert!(matches!(state.trending, FetchState::Error(_)));
        assert_eq!(state.movies.items().len(), 1);
    }

    #[test]
    fn test_cursor_moves_within_bounds() {
        // Arrange
        let mut state = BrowserState::new(WINDOW);
        let (id, _) = state.commit_query();
        state.apply_outcome(id, Ok(vec![row(1, "A"), row(2, "B")]));

        // Act & Assert
        state.move_down();
        assert_eq!(state.cursor, 1);
        state.move_down();
        assert_eq!(state.cursor, 1);
        state.move_up();
        assert_eq!(state.cursor, 0);
        state.move_up();
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_movie_row_extracts_release_year() {
        // Arrange
        let movie = Movie {
            id: 438_631,
            title: String::from("Dune"),
            original_title: String::from("Dune"),
            original_language: String::from("en"),
            release_date: Some(String::from("2021-09-15")),
            overview: None,
            popularity: 93.282,
            vote_average: 7.787,
            vote_count: 12_453,
            genre_ids: vec![878, 12],
            adult: false,
            video: false,
            poster_path: Some(String::from("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg")),
            backdrop_path: None,
        };

        // Act
        let row = MovieRow::from(&movie);

        // Assert
        assert_eq!(row.release_year.as_deref(), Some("2021"));
    }
}
