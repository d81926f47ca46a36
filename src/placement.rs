//! Occupant placement module.
//!
//! This module drops occupants such as the player and the goal onto random floor tiles of an
//! already generated [`Grid`].

use log::trace;
use rand::Rng;

use crate::grid::{Grid, Marker, Position};

/// Places `marker` on a uniformly drawn free floor tile and returns its position.
///
/// Cells are drawn uniformly over the whole grid until a passable tile that does not already hold
/// another occupant comes up (rejection sampling). Any tile already carrying `marker` is turned back
/// into floor first, so the grid never holds the same occupant twice. The placed tile stays
/// passable.
///
/// The grid must contain at least one passable [`Marker::Floor`] tile (or a tile already carrying
/// `marker`); otherwise this function never returns. Generated maps are checked for this by
/// [`World::generate`](crate::world::World::generate) before anything is placed.
pub fn place<R: Rng + ?Sized>(grid: &mut Grid, marker: Marker, rng: &mut R) -> Position {
    debug_assert!(
        marker.is_occupant(),
        "only occupants can be placed, got {marker:?}"
    );
    debug_assert!(!grid.is_empty(), "cannot place an occupant on an empty grid");

    clear(grid, marker);

    let mut attempts = 0_usize;
    loop {
        attempts += 1;
        let position = Position::new(
            rng.gen_range(0..grid.width()),
            rng.gen_range(0..grid.height()),
        );
        let tile = grid.tile_mut(position);

        if tile.marker() == Marker::Floor {
            tile.set_marker(marker);
            trace!("placed {marker:?} at {position} after {attempts} draws");
            return position;
        }
    }
}

/// Turns every tile carrying `marker` back into floor.
pub fn clear(grid: &mut Grid, marker: Marker) {
    for tile in grid.tiles_mut() {
        if tile.marker() == marker {
            tile.set_marker(Marker::Floor);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng as _};

    use super::*;
    use crate::generator::{generate_seeded, DungeonParams};

    #[test]
    fn test_placed_tile_is_passable_and_marked() {
        let mut grid = generate_seeded(&DungeonParams::default(), 99);
        let mut rng = StdRng::seed_from_u64(1);

        let player = place(&mut grid, Marker::Player, &mut rng);
        let goal = place(&mut grid, Marker::Goal, &mut rng);

        assert!(grid.tile(player).passable());
        assert!(grid.tile(goal).passable());
        assert_eq!(grid.tile(player).marker(), Marker::Player);
        assert_eq!(grid.tile(goal).marker(), Marker::Goal);
        assert_ne!(player, goal);
    }

    #[test]
    fn test_single_passable_tile_is_found() {
        let mut grid = Grid::from_rows(&["#####", "#####", "###.#", "#####"])
            .expect("fixture should parse");
        let mut rng = StdRng::seed_from_u64(8);

        let position = place(&mut grid, Marker::Goal, &mut rng);

        assert_eq!(position, Position::new(3, 2));
        assert_eq!(grid.tile(position).marker(), Marker::Goal);
        assert!(grid.tile(position).passable());
    }

    #[test]
    fn test_placing_twice_keeps_a_single_occupant() {
        let mut grid = Grid::from_rows(&["#####", "#...#", "#...#", "#####"])
            .expect("fixture should parse");
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..10 {
            let _position = place(&mut grid, Marker::Player, &mut rng);
        }

        let players = grid
            .tiles()
            .filter(|tile| tile.marker() == Marker::Player)
            .count();
        assert_eq!(players, 1);
    }

    #[test]
    fn test_replacing_the_only_tile_reuses_it() {
        let mut grid = Grid::from_rows(&["###", "#.#", "###"]).expect("fixture should parse");
        let mut rng = StdRng::seed_from_u64(21);

        let first = place(&mut grid, Marker::Player, &mut rng);
        let second = place(&mut grid, Marker::Player, &mut rng);

        assert_eq!(first, second);
    }

    #[test]
    fn test_occupants_never_share_a_tile() {
        for seed in 0..50 {
            let mut grid = Grid::from_rows(&["####", "#..#", "####"]).expect("fixture should parse");
            let mut rng = StdRng::seed_from_u64(seed);

            let player = place(&mut grid, Marker::Player, &mut rng);
            let goal = place(&mut grid, Marker::Goal, &mut rng);

            assert_ne!(player, goal);
        }
    }

    #[test]
    fn test_clear_resets_to_floor() {
        let mut grid = Grid::from_rows(&["#@$#"]).expect("fixture should parse");

        clear(&mut grid, Marker::Player);

        assert_eq!(grid.to_string(), "#.$#");
    }
}
