//! API client library for moviedex.
//!
//! Provides a client for the TMDB API v3 (movie search and discovery).

/// TMDB API client.
pub mod tmdb;
