//! Command-line configuration module.
//!
//! This module declares the command-line interface of the binary and turns it into the plain
//! values the dungeon generator and the application loop consume.

use std::{
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use clap::Parser;
use color_eyre::eyre::Result;

use crate::{debounce::DEFAULT_RESET_INTERVAL_MS, generator::DungeonParams};

/// Command-line arguments of the binary.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Number of columns of the dungeon, border included.
    #[arg(
        long,
        default_value_t = 40,
        value_parser = clap::value_parser!(u64).range(3..=u64::from(u16::MAX))
    )]
    pub width: u64,
    /// Number of rows of the dungeon, border included.
    #[arg(
        long,
        default_value_t = 25,
        value_parser = clap::value_parser!(u64).range(3..=u64::from(u16::MAX))
    )]
    pub height: u64,
    /// Number of tunnels dug into the rock.
    #[arg(long, default_value_t = 130, value_parser = clap::value_parser!(u64).range(1..))]
    pub tunnels: u64,
    /// Number of cells dug by each tunnel.
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..))]
    pub tunnel_length: u64,
    /// Seed for the random number generator; derived from the clock when missing.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Minimum delay in milliseconds between two dungeon resets.
    #[arg(long, default_value_t = DEFAULT_RESET_INTERVAL_MS)]
    pub reset_interval_ms: u64,
    /// Print a solved dungeon to standard output and exit instead of starting the interface.
    #[arg(long)]
    pub print: bool,
    /// File receiving log records.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Generator parameters described by the arguments.
    ///
    /// # Errors
    ///
    /// This function returns an error if a dimension does not fit in a `usize`.
    pub fn params(&self) -> Result<DungeonParams> {
        Ok(DungeonParams {
            width: usize::try_from(self.width)?,
            height: usize::try_from(self.height)?,
            tunnels: usize::try_from(self.tunnels)?,
            tunnel_length: usize::try_from(self.tunnel_length)?,
        })
    }

    /// Seed to use for this run, either the one given or one derived from the clock.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(clock_seed)
    }

    /// Minimum delay between two dungeon resets.
    #[must_use]
    pub const fn reset_interval(&self) -> Duration {
        Duration::from_millis(self.reset_interval_ms)
    }
}

/// Derives a seed from the system clock.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()).rotate_left(32)
        })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_reference_configuration() {
        let args = Args::try_parse_from(["tunnelcrawl"]).expect("defaults should parse");

        assert_eq!(
            args.params().expect("defaults should convert"),
            DungeonParams::default()
        );
        assert_eq!(
            args.reset_interval(),
            Duration::from_millis(DEFAULT_RESET_INTERVAL_MS)
        );
        assert!(!args.print);
        assert!(args.seed.is_none());
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_custom_values() {
        let args = Args::try_parse_from([
            "tunnelcrawl",
            "--width",
            "60",
            "--height",
            "30",
            "--tunnels",
            "200",
            "--tunnel-length",
            "8",
            "--seed",
            "42",
            "--print",
        ])
        .expect("arguments should parse");

        let params = args.params().expect("values should convert");
        assert_eq!(params.width, 60);
        assert_eq!(params.height, 30);
        assert_eq!(params.tunnels, 200);
        assert_eq!(params.tunnel_length, 8);
        assert_eq!(args.seed(), 42);
        assert!(args.print);
    }

    #[test]
    fn test_rejects_grids_without_interior() {
        assert!(Args::try_parse_from(["tunnelcrawl", "--width", "2"]).is_err());
        assert!(Args::try_parse_from(["tunnelcrawl", "--height", "0"]).is_err());
    }

    #[test]
    fn test_dimensions_must_fit_the_terminal_coordinates() {
        let widest = Args::try_parse_from(["tunnelcrawl", "--width", "65535"])
            .expect("the largest terminal width should parse");

        assert_eq!(widest.width, u64::from(u16::MAX));
        assert!(Args::try_parse_from(["tunnelcrawl", "--width", "70000"]).is_err());
        assert!(Args::try_parse_from(["tunnelcrawl", "--height", "65536"]).is_err());
    }

    #[test]
    fn test_rejects_empty_tunnels() {
        assert!(Args::try_parse_from(["tunnelcrawl", "--tunnels", "0"]).is_err());
        assert!(Args::try_parse_from(["tunnelcrawl", "--tunnel-length", "0"]).is_err());
    }
}
