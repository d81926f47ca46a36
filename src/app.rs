//! Core application state and logic for the dungeon viewer.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng as _};
use ratatui::DefaultTerminal;

use crate::{
    config::Args, debounce::Debounce, events, generator::DungeonParams, ui, world::World,
};

/// Outcome of the last path request shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Search {
    /// No path was requested for the current dungeon, or it was cleared.
    Idle,
    /// A path was found, with this many steps.
    Found(usize),
    /// The goal cannot be reached from the player.
    Unreachable,
}

/// Application state container for the dungeon viewer.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the dungeon and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit but it starts off `false`.
    pub(crate) exit: bool,
    /// Current dungeon.
    ///
    /// This field is replaced as a whole on every accepted reset, never edited piecewise.
    pub(crate) world: World,
    /// Parameters every new dungeon is dug with.
    pub(crate) params: DungeonParams,
    /// Random number generator shared by every dungeon of the session.
    pub(crate) rng: StdRng,
    /// Seed the generator was created from.
    pub(crate) seed: u64,
    /// Rate limiter for the reset key.
    pub(crate) reset: Debounce,
    /// Outcome of the last path request.
    pub(crate) search: Search,
    /// Number of dungeons dug this session, the current one included.
    pub(crate) dungeons: usize,
}

impl App {
    /// Creates the application and digs the first dungeon.
    ///
    /// # Errors
    ///
    /// This function returns an error if the parameters never yield a usable dungeon.
    pub fn new(params: DungeonParams, seed: u64, reset_interval: Duration) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let world = World::generate(&params, &mut rng)?;
        info!("session seed {seed}");

        Ok(Self {
            exit: false,
            world,
            params,
            rng,
            seed,
            reset: Debounce::new(reset_interval),
            search: Search::Idle,
            dungeons: 1,
        })
    }

    /// Creates the application from the command-line arguments.
    ///
    /// # Errors
    ///
    /// This function returns an error if the arguments cannot be converted into generator
    /// parameters or never yield a usable dungeon.
    pub fn from_args(args: &Args) -> Result<Self> {
        Self::new(args.params()?, args.seed(), args.reset_interval())
    }

    /// Current dungeon.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Digs a new dungeon unless a reset was accepted less than the debounce interval ago.
    ///
    /// Returns whether the reset went through. The new dungeon replaces the old one in a single
    /// assignment.
    ///
    /// # Errors
    ///
    /// This function returns an error if the parameters never yield a usable dungeon.
    pub(crate) fn regenerate(&mut self, now: Instant) -> Result<bool> {
        if !self.reset.try_accept(now) {
            debug!("reset ignored, last one was less than {:?} ago", self.reset.interval());
            return Ok(false);
        }

        self.world = World::generate(&self.params, &mut self.rng)?;
        self.search = Search::Idle;
        self.dungeons += 1;

        Ok(true)
    }

    /// Computes the path from the player to the goal of the current dungeon.
    pub(crate) fn solve(&mut self) {
        let path = self.world.solve();
        self.search = if path.is_empty() {
            Search::Unreachable
        } else {
            Search::Found(path.steps())
        };
    }

    /// Drops the path of the current dungeon.
    pub(crate) fn clear_path(&mut self) {
        self.world.clear_path();
        self.search = Search::Idle;
    }

    /// Solves the current dungeon and renders it as text, followed by a summary line.
    ///
    /// This is what the binary prints in non-interactive mode.
    pub fn solved_report(&mut self) -> String {
        self.solve();
        let summary = match self.search {
            Search::Found(steps) => format!("path: {steps} steps"),
            Search::Unreachable => "path: goal unreachable".to_owned(),
            Search::Idle => "path: not computed".to_owned(),
        };

        format!(
            "{}\nseed {} | player {} | goal {} | {summary}",
            self.world,
            self.seed,
            self.world.player(),
            self.world.goal()
        )
    }
}
