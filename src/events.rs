//! Event handling functions for user input and application state updates.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::App;

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to [`handle_key`]. It uses a timeout
/// to avoid blocking the UI.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code, Instant::now())?;
            }
        }
    }

    Ok(())
}

/// Applies a single key press received at `now`.
///
/// - `space` digs a new dungeon, at most once per reset interval
/// - `p` computes the path from the player to the goal
/// - `c` clears the path
/// - `q` or `Esc` quits
pub(crate) fn handle_key(app: &mut App, code: KeyCode, now: Instant) -> Result<()> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.exit = true,
        KeyCode::Char(' ') => {
            let _accepted = app.regenerate(now)?;
        }
        KeyCode::Char('p') => app.solve(),
        KeyCode::Char('c') => app.clear_path(),
        _ => {}
    }

    Ok(())
}
