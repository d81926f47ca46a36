//! Tile map data module.
//!
//! This module contains the [`Grid`] type and the cells it is made of. A grid has fixed dimensions
//! for its whole lifetime; it is built once per dungeon and replaced wholesale when a new dungeon
//! is dug.

use std::fmt;

use color_eyre::eyre::{bail, OptionExt as _, Result};

/// Cardinal offsets in the order north, south, east, west.
pub const CARDINALS: [(isize, isize); 4] = [(0, -1), (0, 1), (1, 0), (-1, 0)];

/// Zero-based cell coordinates.
///
/// The `x` component grows to the right (columns) and the `y` component grows downwards (rows).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Column of the cell.
    pub x: usize,
    /// Row of the cell.
    pub y: usize,
}

impl Position {
    /// Builds a position from a column and a row.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by `(dx, dy)`, or `None` if either component would underflow.
    #[must_use]
    pub const fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        let Some(x) = self.x.checked_add_signed(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add_signed(dy) else {
            return None;
        };

        Some(Self { x, y })
    }

    /// Cardinal neighbours of this position that fall inside a `width x height` area.
    pub fn neighbors_within(self, width: usize, height: usize) -> impl Iterator<Item = Self> {
        CARDINALS
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
            .filter(move |next| next.x < width && next.y < height)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.x, self.y)
    }
}

/// Symbolic content of a tile.
///
/// Every marker except [`Marker::Wall`] can be walked on. The player and the goal are not separate
/// entities but markers written over a floor tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Solid rock.
    Wall,
    /// Dug out, empty floor.
    Floor,
    /// Floor tile holding the player.
    Player,
    /// Floor tile holding the goal.
    Goal,
}

impl Marker {
    /// Returns the ASCII glyph used to print this marker.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
            Self::Player => '@',
            Self::Goal => '$',
        }
    }

    /// Parses a glyph as produced by [`Marker::glyph`].
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Floor),
            '@' => Some(Self::Player),
            '$' => Some(Self::Goal),
            _ => None,
        }
    }

    /// Whether a tile carrying this marker can be traversed.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Whether this marker names an occupant rather than terrain.
    #[must_use]
    pub const fn is_occupant(self) -> bool {
        matches!(self, Self::Player | Self::Goal)
    }
}

/// One addressable cell of the grid.
///
/// The passability flag is derived from the marker whenever the marker changes, so a tile is
/// passable exactly when it is not a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Coordinates of the tile within its grid.
    position: Position,
    /// Current content of the tile.
    marker: Marker,
    /// Cached traversal flag, kept equal to `marker.is_passable()`.
    passable: bool,
}

impl Tile {
    /// Builds a tile at `position` carrying `marker`.
    #[must_use]
    pub const fn new(position: Position, marker: Marker) -> Self {
        Self {
            position,
            marker,
            passable: marker.is_passable(),
        }
    }

    /// Coordinates of the tile.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Content of the tile.
    #[must_use]
    pub const fn marker(&self) -> Marker {
        self.marker
    }

    /// Whether the tile can be traversed.
    #[must_use]
    pub const fn passable(&self) -> bool {
        self.passable
    }

    /// Overwrites the marker, keeping the passability flag consistent with it.
    pub fn set_marker(&mut self, marker: Marker) {
        self.marker = marker;
        self.passable = marker.is_passable();
    }
}

/// Fixed-size two dimensional tile map.
///
/// Tiles are stored densely in row-major order. Every in-bounds position holds exactly one tile and
/// the dimensions never change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Row-major tile storage of length `width * height`.
    tiles: Vec<Tile>,
}

impl Grid {
    /// Builds a grid of the given dimensions with every cell set to a wall.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(Position::new(x, y), Marker::Wall)))
            .collect();

        Self {
            width,
            height,
            tiles,
        }
    }

    /// Builds a grid from rows of marker glyphs.
    ///
    /// Each row becomes one line of the grid, so the first row is `y = 0`. This is mostly handy to
    /// describe fixtures in tests.
    ///
    /// # Errors
    ///
    /// This function may return errors if:
    /// - The rows do not all have the same length
    /// - A row contains a character that is not a marker glyph
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Self::new(width, rows.len());

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                bail!("row {y} has {} cells instead of {width}", row.chars().count());
            }
            for (x, glyph) in row.chars().enumerate() {
                let marker = Marker::from_glyph(glyph)
                    .ok_or_eyre("unknown glyph in grid row")?;
                grid.tile_mut(Position::new(x, y)).set_marker(marker);
            }
        }

        Ok(grid)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the grid has no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether `position` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Dense row-major index of `position`, or `None` when it is out of bounds.
    #[must_use]
    pub const fn index(&self, position: Position) -> Option<usize> {
        if self.contains(position) {
            Some(position.y * self.width + position.x)
        } else {
            None
        }
    }

    /// Returns the tile at `position`, or `None` when it is out of bounds.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&Tile> {
        self.index(position).and_then(|idx| self.tiles.get(idx))
    }

    /// Returns the tile at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds. Callers are expected to stay within the grid.
    #[must_use]
    pub fn tile(&self, position: Position) -> &Tile {
        self.get(position)
            .unwrap_or_else(|| panic!("position {position} is outside of the grid"))
    }

    /// Returns a mutable reference to the tile at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub fn tile_mut(&mut self, position: Position) -> &mut Tile {
        let idx = self
            .index(position)
            .unwrap_or_else(|| panic!("position {position} is outside of the grid"));
        self.tiles
            .get_mut(idx)
            .unwrap_or_else(|| panic!("position {position} is outside of the grid"))
    }

    /// Whether the tile at `position` is in bounds and passable.
    #[must_use]
    pub fn is_passable(&self, position: Position) -> bool {
        self.get(position).is_some_and(Tile::passable)
    }

    /// Writes `marker` into the tile at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub fn set_marker(&mut self, position: Position, marker: Marker) {
        self.tile_mut(position).set_marker(marker);
    }

    /// Iterates over every tile in row-major order.
    pub fn tiles(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Iterates mutably over every tile in row-major order.
    pub fn tiles_mut(&mut self) -> std::slice::IterMut<'_, Tile> {
        self.tiles.iter_mut()
    }

    /// Number of passable tiles.
    #[must_use]
    pub fn passable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.passable()).count()
    }

    /// Whether `position` lies on the outermost ring of the grid.
    #[must_use]
    pub const fn is_border(&self, position: Position) -> bool {
        position.x == 0
            || position.y == 0
            || position.x + 1 == self.width
            || position.y + 1 == self.height
    }

    /// In-bounds cardinal neighbours of `position`, passable or not.
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> {
        position.neighbors_within(self.width, self.height)
    }
}

impl<'grid> IntoIterator for &'grid Grid {
    type Item = &'grid Tile;
    type IntoIter = std::slice::Iter<'grid, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, tile) in self.tiles.iter().enumerate() {
            if idx > 0 && idx % self.width == 0 {
                writeln!(formatter)?;
            }
            write!(formatter, "{}", tile.marker().glyph())?;
        }

        Ok(())
    }
}
