use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    munge::{self, MungeArgs},
    plan::{self, PlanArgs},
    setup::{self, SetupArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "nk-sim", about = "NK experiment provisioning and aggregation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create condition directories and replicate command files.
    Setup(SetupArgs),
    /// Print the expanded conditions without touching the filesystem.
    Plan(PlanArgs),
    /// Merge run logs and tables into a single CSV dataset.
    Munge(MungeArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nk=info".parse()?))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Setup(args) => setup::run(&args),
        Command::Plan(args) => plan::run(&args),
        Command::Munge(args) => munge::run(&args),
    }
}
