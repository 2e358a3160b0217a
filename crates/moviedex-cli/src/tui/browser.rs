//! Movie browser TUI main loop.

use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{BrowserState, FetchState, MovieRow, TrendingRow};
use super::ui;
use super::worker::{FetchOutcome, FetchRequest, spawn_worker};
use crate::config::AppConfig;
use moviedex_api::tmdb::TmdbClient;
use moviedex_db::{Connection, load_top};

/// Event poll interval; also bounds debounce-commit latency.
const TICK: Duration = Duration::from_millis(50);

/// Runs the movie browser TUI.
///
/// The trending panel is loaded once from the store at startup; a store
/// failure only degrades that panel. The initial empty-query fetch (the
/// discovery feed) is dispatched before the first frame.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub fn run_browser(
    client: TmdbClient,
    store: Result<Connection>,
    config: &AppConfig,
) -> Result<()> {
    let mut state = BrowserState::new(Duration::from_millis(config.search.debounce_ms));

    let store = match store {
        Ok(conn) => {
            state.set_trending(load_trending(&conn, config.trending.limit));
            Some(conn)
        }
        Err(e) => {
            tracing::warn!(error = %e, "trending store unavailable");
            state.set_trending(FetchState::Error(String::from(
                "Error fetching trending movies",
            )));
            None
        }
    };

    let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
    let (outcome_tx, outcome_rx) = mpsc::channel::<FetchOutcome>();
    let worker = spawn_worker(
        client,
        store,
        config.search.language.clone(),
        request_rx,
        outcome_tx,
    );

    // Fetch-on-mount: empty committed query resolves to the discovery feed.
    let (id, query) = state.commit_query();
    let _ = request_tx.send(FetchRequest { id, query });

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &request_tx, &outcome_rx);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    // Closing the request channel ends the worker.
    drop(request_tx);
    let _ = worker.join();

    result
}

/// Loads the trending panel state from the store.
fn load_trending(conn: &Connection, limit: usize) -> FetchState<TrendingRow> {
    match load_top(conn, limit) {
        Ok(entries) => FetchState::Success(entries.iter().map(TrendingRow::from).collect()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load trending searches");
            FetchState::Error(String::from("Error fetching trending movies"))
        }
    }
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    request_tx: &mpsc::Sender<FetchRequest>,
    outcome_rx: &mpsc::Receiver<FetchOutcome>,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        drain_outcomes(state, outcome_rx);

        if let Some((id, query)) = state.poll_commit(Instant::now()) {
            let _ = request_tx.send(FetchRequest { id, query });
        }

        if event::poll(TICK).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
            && handle_key(state, request_tx, key.code, key.modifiers)
        {
            return Ok(());
        }
    }
}

/// Applies completed fetches, discarding superseded ones.
fn drain_outcomes(state: &mut BrowserState, outcome_rx: &mpsc::Receiver<FetchOutcome>) {
    while let Ok(outcome) = outcome_rx.try_recv() {
        let rows = outcome
            .result
            .map(|movies| movies.iter().map(MovieRow::from).collect());
        state.apply_outcome(outcome.id, rows);
    }
}

/// Handles a key press. Returns `true` to quit.
fn handle_key(
    state: &mut BrowserState,
    request_tx: &mpsc::Sender<FetchRequest>,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    match key {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Esc => {
            if state.input.is_empty() {
                return true;
            }
            state.input_clear(Instant::now());
        }
        KeyCode::Enter => {
            let (id, query) = state.commit_query();
            let _ = request_tx.send(FetchRequest { id, query });
        }
        KeyCode::Up => state.move_up(),
        KeyCode::Down => state.move_down(),
        KeyCode::Backspace => state.input_pop(Instant::now()),
        KeyCode::Char(c) => state.input_push(c, Instant::now()),
        _ => {}
    }
    false
}
