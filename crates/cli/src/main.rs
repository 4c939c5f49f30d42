// SPDX-License-Identifier: MIT

//! amx - the thin operator CLI over the Orchestration API (spec §2): a
//! "test-and-poke" tool for scripting against a `Storage` root without a
//! transport in front of it.

mod commands;
mod context;
mod output;
mod table;

use clap::{Parser, Subcommand};
use commands::{project, scheduler, task, team};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "amx", version, about = "AgentMux - orchestration for fleets of terminal-session agents")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project management
    Project(project::ProjectArgs),
    /// Team lifecycle
    Team(team::TeamArgs),
    /// Task transitions
    Task(task::TaskArgs),
    /// Scheduled message inspection and ad-hoc scheduling
    Scheduler(scheduler::SchedulerArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let api = context::build()?;

    match cli.command {
        Commands::Project(args) => project::handle(args.command, &api, cli.output),
        Commands::Team(args) => team::handle(args.command, &api, cli.output).await,
        Commands::Task(args) => task::handle(args.command, &api, cli.output),
        Commands::Scheduler(args) => scheduler::handle(args.command, &api, cli.output),
    }
}
