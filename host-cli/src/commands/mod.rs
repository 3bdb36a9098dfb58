use anyhow::Result;

use crate::{Cli, Command};

pub mod dump;
pub mod simulate;
pub mod wipe;

pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => simulate::run(&args),
        Command::Dump(args) => dump::run(&args),
        Command::Wipe(args) => wipe::run(&args),
    }
}
