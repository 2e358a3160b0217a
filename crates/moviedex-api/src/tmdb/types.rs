//! TMDB API response types and request parameters.

use serde::Deserialize;

/// Response from `search/movie` and `discover/movie` endpoints.
///
/// Carries the legacy failure envelope (`Response`/`Error`) that some
/// API-compatible backends emit inside a 2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieListResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Result list. Absent in failure envelopes; decodes as empty.
    #[serde(default)]
    pub results: Vec<Movie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
    /// Legacy failure flag; the literal string `"False"` signals failure.
    #[serde(rename = "Response")]
    pub legacy_response: Option<String>,
    /// Legacy failure message accompanying `Response: "False"`.
    #[serde(rename = "Error")]
    pub legacy_error: Option<String>,
}

impl MovieListResponse {
    /// Returns `true` if the body reports an application-level failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.legacy_response.as_deref() == Some("False")
    }
}

/// A single movie entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Release date (YYYY-MM-DD or null).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    pub popularity: f64,
    /// Vote average.
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

/// Parameters for `search/movie`.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query.
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Page number (default: 1).
    pub page: u32,
    /// Include adult results (default: false).
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates search parameters for the given query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the page number.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// Parameters for `discover/movie`.
#[derive(Debug, Clone)]
pub struct DiscoverMovieParams {
    /// Sort order (default: "popularity.desc").
    pub sort_by: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Page number (default: 1).
    pub page: u32,
    /// Include adult results (default: false).
    pub include_adult: bool,
}

impl DiscoverMovieParams {
    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the page number.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

impl Default for DiscoverMovieParams {
    fn default() -> Self {
        Self {
            sort_by: String::from("popularity.desc"),
            language: String::from("en-US"),
            page: 1,
            include_adult: false,
        }
    }
}
