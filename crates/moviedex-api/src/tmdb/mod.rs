//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie endpoints
//! (`search/movie` and `discover/movie`).

mod api;
mod client;
mod error;
mod pacing;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use error::CatalogError;
pub use types::{DiscoverMovieParams, Movie, MovieListResponse, SearchMovieParams};
