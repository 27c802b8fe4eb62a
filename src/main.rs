//! rawsquare CLI entrypoint.
//!
//! Parses arguments, installs logging and dispatches to the library.

use clap::Parser;
use rawsquare_rs::logger;

mod cli;

fn main() -> anyhow::Result<()> {
    let args = cli::CliArgs::parse();
    logger::init();
    cli::run(args)
}
