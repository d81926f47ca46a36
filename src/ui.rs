//! User interface rendering functions for the dungeon screen.

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    app::Search,
    grid::{Marker as TileMarker, Position},
    App,
};

/// Key help shown in the status block.
pub(crate) const HELP: &str = "(space) new dungeon / (p) find path / (c) clear / (q) quit";

/// Renders the dungeon screen.
///
/// This function draws the dungeon canvas centred in the terminal with a status block below it.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations or layout lookups.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let grid = app.world().grid();
    let columns = u16::try_from(grid.width())?;
    let rows = u16::try_from(grid.height())?;

    let overall_layout = Layout::vertical([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());
    let map_full_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get map area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    let map_area = centered(map_full_area, columns, rows)?;

    dungeon(app, frame, map_area)?;
    status(app, frame, status_area);

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Returns a `width x height` rectangle centred within `area`, shrunk to fit if needed.
///
/// # Errors
///
/// This function may return errors if the layout does not yield a cell.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Result<Rect> {
    let row = *Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area)
        .first()
        .ok_or_eyre("failed to get centred row from vertical layout")?;

    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(row)
        .first()
        .copied()
        .ok_or_eyre("failed to get centred cell from horizontal layout")
}

/// Draws floor, path and occupants on a canvas covering `area`.
///
/// Walls are left blank. Layers are painted in order so the occupants stay on top of the path.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub(crate) fn dungeon(app: &App, frame: &mut Frame, area: Rect) -> Result<()> {
    let world = app.world();
    let grid = world.grid();

    let floor: Vec<Position> = grid
        .tiles()
        .filter(|tile| tile.marker() == TileMarker::Floor)
        .map(|tile| tile.position())
        .collect();
    let path: Vec<Position> = world
        .path()
        .iter()
        .copied()
        .filter(|&position| grid.tile(position).marker() == TileMarker::Floor)
        .collect();

    let floor_coords = to_canvas_coords(&floor, grid.width(), grid.height())?;
    let path_coords = to_canvas_coords(&path, grid.width(), grid.height())?;
    let player_coords = to_canvas_coords(&[world.player()], grid.width(), grid.height())?;
    let goal_coords = to_canvas_coords(&[world.goal()], grid.width(), grid.height())?;

    let canvas = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(area.width.into(), 2)).into(),
            (rounded_div::i32(area.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(area.height.into(), 2)).into(),
            (rounded_div::i32(area.height.into(), 2)).into(),
        ])
        .marker(Marker::Block)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &floor_coords,
                color: Color::DarkGray,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &path_coords,
                color: Color::Yellow,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &player_coords,
                color: Color::Cyan,
            });
            ctx.draw(&Points {
                coords: &goal_coords,
                color: Color::Red,
            });
        });

    frame.render_widget(canvas, area);

    Ok(())
}

/// Renders the status line and the key help in a block at the bottom of the screen.
pub(crate) fn status(app: &App, frame: &mut Frame, area: Rect) {
    let world = app.world();
    let search = match app.search {
        Search::Idle => "path: press (p)".to_owned(),
        Search::Found(steps) => format!("path: {steps} steps"),
        Search::Unreachable => "path: goal unreachable".to_owned(),
    };
    let line = Line::raw(format!(
        "dungeon #{} | player {} | goal {} | {search}",
        app.dungeons,
        world.player(),
        world.goal()
    ))
    .centered();

    let block = Block::bordered()
        .title(HELP)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let inner = block.inner(area);

    frame.render_widget(block, area);
    frame.render_widget(line, inner);
}

/// Transforms grid positions to canvas coordinates centred on the origin.
///
/// This function converts grid coordinates (col, row) to canvas coordinates (x, y) using the
/// standard transformation formulas: coordinate[i] = (n - 1) / 2 - i for rows (ascending order) and
/// coordinate[i] = i - (n - 1) / 2 for columns (descending order).
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub(crate) fn to_canvas_coords(
    positions: &[Position],
    width: usize,
    height: usize,
) -> Result<Vec<(f64, f64)>> {
    let rows_n = f64::from(u16::try_from(height)?);
    let cols_n = f64::from(u16::try_from(width)?);

    positions
        .iter()
        .map(|position| {
            let screen_y = (rows_n - 1.) / 2. - f64::from(u16::try_from(position.y)?);
            let screen_x = f64::from(u16::try_from(position.x)?) - (cols_n - 1.) / 2.;

            Ok((screen_x, screen_y))
        })
        .collect()
}
