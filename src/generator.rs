//! Dungeon generation module.
//!
//! This module digs a traversable map out of a solid [`Grid`] by running a number of independent
//! random walks ("tunnels") over it. The border ring is sealed again afterwards so the dungeon is
//! always fully enclosed. Connectivity between tunnels is not guaranteed.

use log::debug;
use rand::{rngs::StdRng, seq::IteratorRandom as _, Rng, SeedableRng as _};

use crate::grid::{Grid, Marker, Position, Tile};

/// Map width of the reference configuration.
pub const DEFAULT_WIDTH: usize = 40;
/// Map height of the reference configuration.
pub const DEFAULT_HEIGHT: usize = 25;
/// Number of tunnels dug in the reference configuration.
pub const DEFAULT_TUNNELS: usize = 130;
/// Length of each tunnel in the reference configuration.
pub const DEFAULT_TUNNEL_LENGTH: usize = 15;

/// Parameters of a generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DungeonParams {
    /// Number of columns of the produced grid.
    pub width: usize,
    /// Number of rows of the produced grid.
    pub height: usize,
    /// Number of independent digging passes.
    pub tunnels: usize,
    /// Number of cells marked by every digging pass.
    pub tunnel_length: usize,
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tunnels: DEFAULT_TUNNELS,
            tunnel_length: DEFAULT_TUNNEL_LENGTH,
        }
    }
}

/// Summary of a generated grid, used for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationStats {
    /// Number of passable tiles.
    pub floor_tiles: usize,
    /// Number of tiles in the grid.
    pub total_tiles: usize,
}

impl GenerationStats {
    /// Collects the statistics of `grid`.
    #[must_use]
    pub fn of(grid: &Grid) -> Self {
        Self {
            floor_tiles: grid.passable_count(),
            total_tiles: grid.len(),
        }
    }

    /// Share of floor tiles, as a whole percentage rounded down.
    #[must_use]
    pub const fn floor_percent(&self) -> usize {
        match self.total_tiles {
            0 => 0,
            total => self.floor_tiles * 100 / total,
        }
    }
}

/// Random walk over the cells of a `width x height` area.
///
/// The walk yields exactly `length` positions. The first one is drawn uniformly from the whole
/// area; every following one is a uniformly drawn in-bounds cardinal neighbour of the previous.
/// Only in-bounds directions are ever drawn, so no step is lost to the edges. On a 1x1 area the
/// walk stays in place.
pub struct Walk<'rng, R: Rng + ?Sized> {
    /// Width of the walked area.
    width: usize,
    /// Height of the walked area.
    height: usize,
    /// Position to be yielded next.
    cursor: Position,
    /// Positions left to yield.
    remaining: usize,
    /// Source of randomness for the direction draws.
    rng: &'rng mut R,
}

impl<'rng, R: Rng + ?Sized> Walk<'rng, R> {
    /// Starts a walk of `length` steps from a random cell.
    ///
    /// # Panics
    ///
    /// Panics if the area is empty, as there is no cell to start from.
    pub fn new(width: usize, height: usize, length: usize, rng: &'rng mut R) -> Self {
        assert!(width > 0 && height > 0, "cannot walk over an empty area");
        let cursor = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));

        Self {
            width,
            height,
            cursor,
            remaining: length,
            rng,
        }
    }

    /// Picks the next cursor among the in-bounds neighbours of the current one.
    fn advance(&mut self) {
        if let Some(next) = self
            .cursor
            .neighbors_within(self.width, self.height)
            .choose(&mut *self.rng)
        {
            self.cursor = next;
        }
    }
}

impl<R: Rng + ?Sized> Iterator for Walk<'_, R> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let current = self.cursor;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Digs a dungeon with the given parameters.
///
/// Every cell starts as a wall. Each of the `tunnels` passes walks `tunnel_length` cells (see
/// [`Walk`]) and turns each of them into floor. The border ring is forced back to walls at the end.
pub fn generate<R: Rng + ?Sized>(params: &DungeonParams, rng: &mut R) -> Grid {
    let mut grid = Grid::new(params.width, params.height);
    if grid.is_empty() {
        return grid;
    }

    for _ in 0..params.tunnels {
        for position in Walk::new(params.width, params.height, params.tunnel_length, rng) {
            grid.set_marker(position, Marker::Floor);
        }
    }

    seal_border(&mut grid);

    let stats = GenerationStats::of(&grid);
    debug!(
        "dug {}x{} dungeon: {}/{} floor tiles ({}%)",
        params.width,
        params.height,
        stats.floor_tiles,
        stats.total_tiles,
        stats.floor_percent()
    );

    grid
}

/// Digs a dungeon from a fixed seed, yielding the same grid for the same inputs.
#[must_use]
pub fn generate_seeded(params: &DungeonParams, seed: u64) -> Grid {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(params, &mut rng)
}

/// Turns every tile of the outermost ring back into a wall.
fn seal_border(grid: &mut Grid) {
    let border: Vec<Position> = grid
        .tiles()
        .map(Tile::position)
        .filter(|position| grid.is_border(*position))
        .collect();

    for position in border {
        grid.set_marker(position, Marker::Wall);
    }
}
