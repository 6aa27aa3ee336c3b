//! Bounce CLI - expand export profiles into concrete export jobs.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bounce")]
#[command(author, version, about = "Bounce export job planner", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the export jobs a profile expands into
    Jobs(commands::jobs::JobsArgs),

    /// Show the export graph a profile builds
    Graph(commands::graph::GraphArgs),

    /// List and manage export profiles
    Profiles(commands::profiles::ProfilesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Jobs(args) => commands::jobs::run(args),
        Commands::Graph(args) => commands::graph::run(args),
        Commands::Profiles(args) => commands::profiles::run(args),
    }
}
