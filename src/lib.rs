//! Dungeon digging and pathfinding on a tile grid.
//!
//! The library digs a dungeon out of solid rock with random tunnels ([`generator`]), drops a player
//! and a goal on its floor ([`placement`]) and finds the shortest route between them with an A*
//! search ([`pathfinding`]) driven by an indexed min-heap ([`queue`]). [`world::World`] ties those
//! pieces together, and [`App`] is the terminal interface built on top of them.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

pub mod config;
pub mod debounce;
pub mod generator;
pub mod grid;
pub mod logging;
pub mod pathfinding;
pub mod placement;
pub mod queue;
pub mod world;

mod app;
mod events;
mod ui;

pub use app::App;
