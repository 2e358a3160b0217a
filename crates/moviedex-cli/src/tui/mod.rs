//! TUI module for the interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod browser;
/// Browser state types.
pub mod state;
mod ui;
mod worker;

pub use browser::run_browser;
