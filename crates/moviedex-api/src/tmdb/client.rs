//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalCatalogApi;
use super::error::CatalogError;
use super::pacing::RequestPacer;
use super::types::{DiscoverMovieParams, MovieListResponse, SearchMovieParams};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Error body shape for non-2xx TMDB responses.
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    /// TMDB-internal status code.
    status_code: u32,
    /// Human-readable message.
    status_message: String,
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Outbound request pacer.
    pacer: Arc<Mutex<RequestPacer>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let pacer = self
            .min_interval
            .map_or_else(RequestPacer::with_default_spacing, RequestPacer::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            pacer: Arc::new(Mutex::new(pacer)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Sends a GET request with Bearer auth, query params, and request pacing.
    ///
    /// A single attempt per call: transport failures, non-success statuses,
    /// and undecodable bodies all map to `CatalogError::Transport`.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        self.pacer.lock().await.acquire().await;

        let url = self
            .base_url
            .join(path)
            .map_err(|e| CatalogError::transport(format!("failed to join URL {path}: {e}")))?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .build()
            .map_err(|e| CatalogError::transport(format!("failed to build request: {e}")))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| CatalogError::transport(format!("request failed: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_body) = serde_json::from_str::<TmdbErrorBody>(&body) {
                return Err(CatalogError::transport(format!(
                    "HTTP {}: code={}, message={}",
                    status, error_body.status_code, error_body.status_message,
                )));
            }
            return Err(CatalogError::transport(format!("HTTP {status}: {body}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::transport(format!("failed to read body: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| CatalogError::transport(format!("failed to decode JSON: {e}")))
    }

    /// Rejects bodies that report failure inside a success response.
    fn check_envelope(response: MovieListResponse) -> Result<MovieListResponse, CatalogError> {
        if response.is_failure() {
            return Err(CatalogError::application(response.legacy_error));
        }
        Ok(response)
    }
}

impl LocalCatalogApi for TmdbClient {
    #[instrument(skip_all)]
    async fn search_movies(
        &self,
        params: &SearchMovieParams,
    ) -> Result<MovieListResponse, CatalogError> {
        let query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];

        let response = self.get_json("search/movie", &query).await?;
        Self::check_envelope(response)
    }

    #[instrument(skip_all)]
    async fn discover_movies(
        &self,
        params: &DiscoverMovieParams,
    ) -> Result<MovieListResponse, CatalogError> {
        let query: Vec<(&str, String)> = vec![
            ("sort_by", params.sort_by.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];

        let response = self.get_json("discover/movie", &query).await?;
        Self::check_envelope(response)
    }

    #[instrument(skip_all)]
    async fn fetch(
        &self,
        query: &str,
        language: &str,
    ) -> Result<MovieListResponse, CatalogError> {
        let term = query.trim();
        if term.is_empty() {
            let params = DiscoverMovieParams::default().language(language);
            self.discover_movies(&params).await
        } else {
            let params = SearchMovieParams::new(term).language(language);
            self.search_movies(&params).await
        }
    }
}
