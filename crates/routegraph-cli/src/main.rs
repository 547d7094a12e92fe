use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use routegraph_cli::commands::{handle_load, handle_route, handle_status, prepare_store};
use routegraph_cli::logging::{init_logging, LoggingConfig};
use routegraph_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Travel-time graph loader and route finder")]
struct Cli {
    /// Replace the bundled default graph with this CSV before running the command.
    #[arg(long, env = "ROUTEGRAPH_GRAPH", global = true)]
    graph: Option<PathBuf>,

    /// Output format for command results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the loaded connections and origin locations.
    Status,
    /// Compute the fastest route between two locations.
    Route {
        /// Starting location.
        from: String,
        /// Destination location.
        to: String,
    },
    /// Load a CSV graph file and report how it was ingested.
    ///
    /// Validates and reports only: the loaded graph is not kept after the command exits.
    Load {
        /// Semicolon-delimited file with a header line and `origin;destination;time` rows.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env());
    let cli = Cli::parse();

    let store = prepare_store(cli.graph.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Status => handle_status(&store, cli.format, &mut out),
        Command::Route { from, to } => handle_route(&store, &from, &to, cli.format, &mut out),
        Command::Load { path } => handle_load(&store, &path, cli.format, &mut out),
    }
}
