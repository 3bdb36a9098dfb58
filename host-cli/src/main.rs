use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod config;
mod image;
mod terminal;

#[derive(Parser, Debug)]
#[command(author, version, about = "Keypad access controller simulator")]
pub struct Cli {
    /// Log state transitions and store writes.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Boot the device and feed it keypad symbols read from stdin.
    Run(RunArgs),
    /// Print the stored count and every enrolled code.
    Dump(ImageArgs),
    /// Forget every enrolled code.
    Wipe(ImageArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Store image file; created zero-filled when missing.
    #[arg(long, value_name = "PATH")]
    image: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    image: ImageArgs,
    /// JSON device configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Skip dwell intervals instead of sleeping through them.
    #[arg(long)]
    fast: bool,
    /// Hold the enroll key at power-on to open enrollment.
    #[arg(long)]
    enroll: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .format_timestamp(None)
        .format_module_path(false)
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    commands::execute(cli)
}
