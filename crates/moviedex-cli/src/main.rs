//! moviedex - terminal movie browser with trending searches.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::run_browser;
use moviedex_api::tmdb::{
    DiscoverMovieParams, LocalCatalogApi, Movie, SearchMovieParams, TmdbClient,
};
use moviedex_db::{MovieSnapshot, load_top, open_db, record_search};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies interactively (debounced search + trending panel).
    Browse,
    /// Search for movies by term.
    Search(SearchArgs),
    /// Show the discovery feed (popular movies).
    Discover(DiscoverArgs),
    /// Show the top trending search terms.
    Trending(TrendingArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "dune").
    #[arg(long, required = true)]
    query: String,
    /// Response language (default: "en-US").
    #[arg(long, default_value = "en-US")]
    language: String,
}

/// Arguments for the `discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Response language (default: "en-US").
    #[arg(long, default_value = "en-US")]
    language: String,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Number of entries to show.
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client() -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Prints a movie result table.
fn print_movies(movies: &[Movie]) {
    tracing::info!("ID\tTitle\t\t\tYear\tRating\tPopularity");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}\t{:.1}\t{:.1}",
            movie.id,
            movie.title,
            movie
                .release_date
                .as_deref()
                .and_then(|d| d.get(..4))
                .unwrap_or("-"),
            movie.vote_average,
            movie.popularity,
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Runs the `search` subcommand.
///
/// On a successful search with at least one result, records the term in
/// the trending store (best-effort).
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client()?;

    let params = SearchMovieParams::new(&args.query).language(&args.language);
    let response = client
        .search_movies(&params)
        .await
        .context("TMDB search/movie request failed")?;

    print_movies(&response.results);

    if let Some(first) = response.results.first() {
        let snapshot = MovieSnapshot {
            movie_id: first.id,
            movie_title: first.title.clone(),
            poster_path: first.poster_path.clone(),
        };
        match open_db(dir) {
            Ok(conn) => {
                if let Err(e) = record_search(&conn, &args.query, &snapshot) {
                    tracing::warn!(error = %e, "failed to record trending search");
                }
            }
            Err(e) => tracing::warn!(error = %e, "trending store unavailable"),
        }
    }

    Ok(())
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_discover(args: &DiscoverArgs, _dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client()?;

    let params = DiscoverMovieParams::default().language(&args.language);
    let response = client
        .discover_movies(&params)
        .await
        .context("TMDB discover/movie request failed")?;

    print_movies(&response.results);

    Ok(())
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or read.
#[instrument(skip_all)]
fn run_trending(args: &TrendingArgs, dir: Option<&PathBuf>) -> Result<()> {
    let conn = open_db(dir).context("failed to open trending store")?;
    let entries = load_top(&conn, args.limit).context("failed to load trending searches")?;

    if entries.is_empty() {
        tracing::info!("No trending searches yet. Run `search` or `browse` first.");
        return Ok(());
    }

    tracing::info!("Rank\tCount\tTerm\t\tMovie");
    for (i, entry) in entries.iter().enumerate() {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            i.saturating_add(1),
            entry.count,
            entry.search_term,
            entry.movie_title,
        );
    }

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build, the config cannot be
/// loaded, or the TUI fails.
#[instrument(skip_all)]
fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load_or_init(&config_path).context("failed to load config")?;

    let client = build_tmdb_client()?;
    let store = open_db(dir);

    run_browser(client, store, &config).context("movie browser TUI failed")
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Browse => run_browse(cli.dir.as_ref()),
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Discover(args) => run_discover(&args, cli.dir.as_ref()).await,
        Commands::Trending(args) => run_trending(&args, cli.dir.as_ref()),
    }
}
