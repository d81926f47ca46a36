//! Pathfinding module.
//!
//! This module contains an A* search over the passable tiles of a [`Grid`], moving in the four
//! cardinal directions at a uniform cost of one per step. The open set is the indexed
//! [`MinHeap`], so a node that is reached again through a cheaper route has its priority lowered
//! in place instead of being queued twice.

use log::{debug, warn};

use crate::{
    grid::{Grid, Position},
    queue::{Handle, MinHeap},
};

/// Ordered sequence of positions from a start tile to a goal tile.
///
/// A path holds both endpoints, start first and goal last, so a path of `n` positions takes
/// `n - 1` steps. A path from a tile to itself is that single tile. The empty path means that no
/// route exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    /// Positions from start to goal, both included.
    positions: Vec<Position>,
}

impl Path {
    /// Positions of the path, start first.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Number of moves needed to walk the path.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    /// Number of positions, endpoints included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the path is empty, which means no route was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether the path goes through `position`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    /// First position of the path.
    #[must_use]
    pub fn start(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    /// Last position of the path.
    #[must_use]
    pub fn goal(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    /// Iterates over the positions of the path, start first.
    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }
}

impl<'path> IntoIterator for &'path Path {
    type Item = &'path Position;
    type IntoIter = std::slice::Iter<'path, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Manhattan distance between two positions.
///
/// On a 4-connected grid with unit step cost this never overestimates the remaining cost and
/// never drops by more than one between neighbours, which lets the search close a node the first
/// time it is popped.
#[must_use]
pub const fn manhattan(from: Position, to: Position) -> usize {
    from.x.abs_diff(to.x) + from.y.abs_diff(to.y)
}

/// Per-cell bookkeeping of a search.
#[derive(Clone, Copy, Debug, Default)]
struct Node {
    /// Cheapest known cost from the start.
    cost: Option<usize>,
    /// Predecessor on the cheapest known route.
    parent: Option<Position>,
    /// Set once the node is popped and its cost is final.
    closed: bool,
    /// Handle in the open set while the node is queued.
    handle: Option<Handle>,
}

/// Finds a shortest path from `start` to `goal`.
///
/// The returned path holds both endpoints (see [`Path`]). When the goal cannot be reached the
/// path is empty; that is an expected outcome on maps whose tunnels do not connect. Both endpoints
/// are expected to be passable, and an empty path is returned if one of them is not.
///
/// # Panics
///
/// Panics if `start` or `goal` lies outside of the grid.
#[must_use]
pub fn find_path(grid: &Grid, start: Position, goal: Position) -> Path {
    if !grid.tile(start).passable() || !grid.tile(goal).passable() {
        warn!("path requested between {start} and {goal} but an endpoint is a wall");
        return Path::default();
    }
    if start == goal {
        return Path {
            positions: vec![start],
        };
    }

    let mut nodes = vec![Node::default(); grid.len()];
    let mut open = MinHeap::with_capacity(grid.len());
    let mut expanded = 0_usize;

    if let Some(node) = grid.index(start).and_then(|idx| nodes.get_mut(idx)) {
        node.cost = Some(0);
        node.handle = Some(open.push(start, manhattan(start, goal)));
    }

    while !open.is_empty() {
        let Ok((current, _)) = open.pop_min() else {
            break;
        };
        let Some(node) = grid.index(current).and_then(|idx| nodes.get_mut(idx)) else {
            continue;
        };
        node.closed = true;
        node.handle = None;
        let cost = node.cost.unwrap_or_default();
        expanded += 1;

        if current == goal {
            let path = reconstruct(grid, &nodes, goal);
            debug!(
                "path {start} -> {goal}: {} steps, {expanded} nodes expanded",
                path.steps()
            );
            return path;
        }

        for neighbor in grid.neighbors(current) {
            if !grid.is_passable(neighbor) {
                continue;
            }
            let Some(node) = grid.index(neighbor).and_then(|idx| nodes.get_mut(idx)) else {
                continue;
            };
            let tentative = cost + 1;
            if node.closed || node.cost.is_some_and(|known| known <= tentative) {
                continue;
            }

            node.cost = Some(tentative);
            node.parent = Some(current);
            let priority = tentative + manhattan(neighbor, goal);
            match node.handle {
                Some(handle) if open.update_priority(handle, neighbor, priority).is_ok() => {}
                _ => node.handle = Some(open.push(neighbor, priority)),
            }
        }
    }

    debug!("no path {start} -> {goal}, {expanded} nodes expanded");
    Path::default()
}

/// Follows predecessor links back from `goal` and returns the route in walking order.
fn reconstruct(grid: &Grid, nodes: &[Node], goal: Position) -> Path {
    let mut positions = vec![goal];
    let mut current = goal;
    while let Some(parent) = grid
        .index(current)
        .and_then(|idx| nodes.get(idx))
        .and_then(|node| node.parent)
    {
        positions.push(parent);
        current = parent;
    }
    positions.reverse();

    Path { positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate_seeded, DungeonParams};

    /// Builds a grid where every tile is floor.
    fn open_grid(width: usize, height: usize) -> Grid {
        let row = ".".repeat(width);
        let rows: Vec<&str> = (0..height).map(|_| row.as_str()).collect();
        Grid::from_rows(&rows).expect("open grid should parse")
    }

    /// Checks that consecutive positions are passable cardinal neighbours.
    fn assert_walkable(grid: &Grid, path: &Path) {
        for position in path {
            assert!(grid.is_passable(*position), "{position} is not passable");
        }
        for pair in path.positions().windows(2) {
            if let [from, to] = pair {
                assert_eq!(manhattan(*from, *to), 1, "{from} and {to} are not adjacent");
            }
        }
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(Position::new(0, 0), Position::new(3, 4)), 7);
        assert_eq!(manhattan(Position::new(5, 1), Position::new(2, 6)), 8);
        assert_eq!(manhattan(Position::new(2, 2), Position::new(2, 2)), 0);
    }

    #[test]
    fn test_open_grid_path_is_manhattan_distance() {
        for (width, height) in [(2, 2), (5, 3), (10, 10), (40, 25)] {
            let grid = open_grid(width, height);
            let start = Position::new(0, 0);
            let goal = Position::new(width - 1, height - 1);

            let path = find_path(&grid, start, goal);

            assert_eq!(path.steps(), (width - 1) + (height - 1));
            assert_eq!(path.start(), Some(start));
            assert_eq!(path.goal(), Some(goal));
            assert_walkable(&grid, &path);
        }
    }

    #[test]
    fn test_walled_in_goal_has_no_path() {
        let grid = Grid::from_rows(&[".....", "..#..", ".#.#.", "..#..", "....."])
            .expect("fixture should parse");

        let path = find_path(&grid, Position::new(0, 0), Position::new(2, 2));

        assert!(path.is_empty());
        assert_eq!(path.steps(), 0);
    }

    #[test]
    fn test_path_through_single_opening() {
        let grid = Grid::from_rows(&["..#..", "..#..", ".....", "..#..", "..#.."])
            .expect("fixture should parse");

        let path = find_path(&grid, Position::new(0, 0), Position::new(4, 4));

        assert!(path.contains(Position::new(2, 2)));
        assert_eq!(path.steps(), 8);
        assert_walkable(&grid, &path);
    }

    #[test]
    fn test_start_equals_goal_is_single_tile() {
        let grid = Grid::from_rows(&["."]).expect("fixture should parse");
        let origin = Position::new(0, 0);

        for _ in 0..3 {
            let path = find_path(&grid, origin, origin);
            assert_eq!(path.positions(), &[origin]);
            assert_eq!(path.steps(), 0);
            assert!(!path.is_empty());
        }
    }

    #[test]
    fn test_repeated_searches_agree_on_length() {
        let grid = open_grid(12, 9);
        let start = Position::new(1, 7);
        let goal = Position::new(10, 2);

        let first = find_path(&grid, start, goal);
        for _ in 0..5 {
            assert_eq!(find_path(&grid, start, goal).steps(), first.steps());
        }
    }

    #[test]
    fn test_wall_endpoint_yields_empty_path() {
        let grid = Grid::from_rows(&["..#"]).expect("fixture should parse");

        assert!(find_path(&grid, Position::new(0, 0), Position::new(2, 0)).is_empty());
        assert!(find_path(&grid, Position::new(2, 0), Position::new(0, 0)).is_empty());
    }

    #[test]
    fn test_detour_around_wall() {
        let grid = Grid::from_rows(&[
            ".......",
            ".#####.",
            ".....#.",
            "######.",
        ])
        .expect("fixture should parse");

        let path = find_path(&grid, Position::new(0, 2), Position::new(6, 3));

        // Up the left side, along the top and down the right side.
        assert_eq!(path.steps(), 2 + 6 + 3);
        assert_walkable(&grid, &path);
    }

    #[test]
    fn test_occupant_tiles_are_walkable() {
        let grid = Grid::from_rows(&["#####", "#@.$#", "#####"]).expect("fixture should parse");

        let path = find_path(&grid, Position::new(1, 1), Position::new(3, 1));

        assert_eq!(path.steps(), 2);
    }

    #[test]
    fn test_generated_dungeon_paths_are_optimal_and_walkable() {
        for seed in 0..10 {
            let grid = generate_seeded(&DungeonParams::default(), seed);
            let floor: Vec<Position> = grid
                .tiles()
                .filter(|tile| tile.passable())
                .map(|tile| tile.position())
                .collect();
            let (Some(&start), Some(&goal)) = (floor.first(), floor.last()) else {
                continue;
            };

            let path = find_path(&grid, start, goal);

            if !path.is_empty() {
                assert!(path.steps() >= manhattan(start, goal));
                assert_eq!(path.start(), Some(start));
                assert_eq!(path.goal(), Some(goal));
                assert_walkable(&grid, &path);
            }
        }
    }

    #[test]
    #[should_panic(expected = "outside of the grid")]
    fn test_out_of_bounds_endpoint_panics() {
        let grid = open_grid(3, 3);
        let _path = find_path(&grid, Position::new(0, 0), Position::new(3, 0));
    }
}
