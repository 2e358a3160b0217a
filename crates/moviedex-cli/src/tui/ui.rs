//! TUI rendering logic for the movie browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::state::{BrowserState, FetchState};

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_search_box(frame, chunks[0], state);
    draw_main(frame, chunks[1], state);
    draw_footer(frame, chunks[2]);
}

/// Draws the search input box.
fn draw_search_box(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let style = if state.debounce.is_pending() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(state.input.as_str()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search through thousands of movies "),
    );
    frame.render_widget(input, area);
}

/// Draws the trending panel and the movie list.
#[allow(clippy::indexing_slicing)]
fn draw_main(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    draw_trending_pane(frame, pane_chunks[0], state);
    draw_movies_pane(frame, pane_chunks[1], state);
}

/// Draws the trending searches panel (left).
fn draw_trending_pane(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Trending Searches ");

    match &state.trending {
        FetchState::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
        }
        FetchState::Error(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(error, area);
        }
        FetchState::Success(rows) => {
            let items: Vec<ListItem> = rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:>2}. ", i.saturating_add(1)),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::raw(format!("{} ", row.search_term)),
                        Span::styled(
                            format!("({})  {}", row.count, row.movie_title),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect();
            frame.render_widget(List::new(items).block(block), area);
        }
    }
}

/// Draws the movie list (right).
fn draw_movies_pane(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let title = if state.committed_query.is_empty() {
        String::from(" All Movies ")
    } else {
        format!(" Results for \u{201c}{}\u{201d} ", state.committed_query)
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    match &state.movies {
        FetchState::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
        }
        FetchState::Error(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(error, area);
        }
        FetchState::Success(rows) if rows.is_empty() => {
            let empty = Paragraph::new("No movies found.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
        }
        FetchState::Success(rows) => {
            let items: Vec<ListItem> = rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    let marker = if i == state.cursor { "\u{25b8} " } else { "  " };
                    let style = if i == state.cursor {
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };

                    ListItem::new(Line::from(vec![
                        Span::raw(String::from(marker)),
                        Span::styled(
                            format!(
                                "{}  ({})  \u{2605} {:.1}",
                                row.title,
                                row.release_year.as_deref().unwrap_or("-"),
                                row.vote_average,
                            ),
                            style,
                        ),
                    ]))
                })
                .collect();
            frame.render_widget(List::new(items).block(block), area);
        }
    }
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect) {
    let help_text =
        "Type to search  \u{2191}\u{2193}: move  Enter: search now  Esc: clear/quit  Ctrl+C: quit";
    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
