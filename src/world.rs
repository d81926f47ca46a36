//! World state module.
//!
//! This module bundles everything a dungeon run is made of: the tile map, the player and goal
//! positions, and the last computed path. A new dungeon is always a brand new [`World`] that the
//! owner swaps in with a single assignment, so readers never see a half-built state.

use std::fmt;

use color_eyre::eyre::{bail, ensure, Result};
use log::{debug, info};
use rand::Rng;

use crate::{
    generator::{self, DungeonParams},
    grid::{Grid, Marker, Position},
    pathfinding::{self, Path},
    placement,
};

/// Number of maps dug before giving up on parameters that keep producing degenerate dungeons.
pub const MAX_GENERATION_ATTEMPTS: usize = 32;

/// Glyph printed over floor tiles that belong to the path.
pub const PATH_GLYPH: char = '*';

/// Owned state of one dungeon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    /// Tile map holding the player and goal markers.
    grid: Grid,
    /// Position of the player marker.
    player: Position,
    /// Position of the goal marker.
    goal: Position,
    /// Last computed route from the player to the goal.
    path: Path,
}

impl World {
    /// Digs a new dungeon and drops the player and the goal onto it.
    ///
    /// Maps with fewer than two passable tiles cannot hold both occupants; such maps are thrown
    /// away and dug again, up to [`MAX_GENERATION_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// This function returns an error if every attempt produced a degenerate map, which happens
    /// when the parameters leave no room for floor (for instance a grid narrower than three
    /// cells).
    pub fn generate<R: Rng + ?Sized>(params: &DungeonParams, rng: &mut R) -> Result<Self> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let grid = generator::generate(params, rng);
            if grid.passable_count() >= 2 {
                let world = Self::populate(grid, rng);
                info!(
                    "new {}x{} dungeon, player at {}, goal at {}",
                    params.width, params.height, world.player, world.goal
                );
                return Ok(world);
            }
            debug!("attempt {attempt} dug a degenerate map, digging again");
        }

        bail!(
            "failed to dig a dungeon with room for two occupants in {MAX_GENERATION_ATTEMPTS} attempts"
        )
    }

    /// Wraps an existing grid, placing the player and the goal onto it.
    ///
    /// Occupant markers already present in `grid` are discarded before placement.
    ///
    /// # Errors
    ///
    /// This function returns an error if the grid has fewer than two passable tiles.
    pub fn from_grid<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> Result<Self> {
        ensure!(
            grid.passable_count() >= 2,
            "a world needs at least two passable tiles"
        );

        Ok(Self::populate(grid, rng))
    }

    /// Places both occupants on a grid known to have room for them.
    fn populate<R: Rng + ?Sized>(mut grid: Grid, rng: &mut R) -> Self {
        placement::clear(&mut grid, Marker::Player);
        placement::clear(&mut grid, Marker::Goal);
        let player = placement::place(&mut grid, Marker::Player, rng);
        let goal = placement::place(&mut grid, Marker::Goal, rng);

        Self {
            grid,
            player,
            goal,
            path: Path::default(),
        }
    }

    /// The tile map.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Position of the player.
    #[must_use]
    pub const fn player(&self) -> Position {
        self.player
    }

    /// Position of the goal.
    #[must_use]
    pub const fn goal(&self) -> Position {
        self.goal
    }

    /// Last computed path; empty until [`World::solve`] runs or when no route exists.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Computes a fresh path from the player to the goal and keeps it.
    pub fn solve(&mut self) -> &Path {
        self.path = pathfinding::find_path(&self.grid, self.player, self.goal);
        if self.path.is_empty() {
            info!("goal at {} cannot be reached from {}", self.goal, self.player);
        } else {
            info!("path found, {} steps", self.path.steps());
        }

        &self.path
    }

    /// Forgets the last computed path.
    pub fn clear_path(&mut self) {
        self.path = Path::default();
    }
}

impl fmt::Display for World {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.grid.height() {
            if y > 0 {
                writeln!(formatter)?;
            }
            for x in 0..self.grid.width() {
                let position = Position::new(x, y);
                let marker = self.grid.tile(position).marker();
                let glyph = if marker == Marker::Floor && self.path.contains(position) {
                    PATH_GLYPH
                } else {
                    marker.glyph()
                };
                write!(formatter, "{glyph}")?;
            }
        }

        Ok(())
    }
}
