//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::CatalogError;
use super::types::{DiscoverMovieParams, MovieListResponse, SearchMovieParams};

/// Catalog API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Searches for movies by term.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Transport` if the HTTP request fails or the
    /// body cannot be decoded, and `CatalogError::Application` if the API
    /// reports failure inside a success response.
    async fn search_movies(
        &self,
        params: &SearchMovieParams,
    ) -> Result<MovieListResponse, CatalogError>;

    /// Fetches the discovery feed (generally popular movies).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`LocalCatalogApi::search_movies`].
    async fn discover_movies(
        &self,
        params: &DiscoverMovieParams,
    ) -> Result<MovieListResponse, CatalogError>;

    /// Fetches the catalog for a committed query.
    ///
    /// A non-empty (after trimming) query hits the search endpoint with
    /// the term URL-encoded; an empty query hits the discovery endpoint
    /// sorted by descending popularity.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`LocalCatalogApi::search_movies`].
    async fn fetch(&self, query: &str, language: &str)
    -> Result<MovieListResponse, CatalogError>;
}
