//! This crate contains the source code for the binary of the dungeon viewer tunnelcrawl.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use tunnelcrawl::{config::Args, logging, App};

fn main() -> Result<()> {
    install()?;

    let args = Args::parse();
    logging::init(args.log_file.as_deref(), args.print)?;
    let mut app = App::from_args(&args)?;

    if args.print {
        println!("{}", app.solved_report());
        return Ok(());
    }

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}
