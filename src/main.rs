mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{FilterOptions, ProjectCommand, ProjectionSide, ResourcesCommand, SummaryCommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tfplan")]
#[command(about = "Parse OpenTofu/Terraform plan output into a structured change tree", long_about = None)]
#[command(version)]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed resource changes as JSON
    Resources {
        /// Saved plan output, or - for standard input
        path: String,
    },

    /// Print each resource's attribute values before the change
    Before {
        /// Saved plan output, or - for standard input
        path: String,

        #[command(flatten)]
        filters: FilterOptions,
    },

    /// Print each resource's attribute values after the change
    After {
        /// Saved plan output, or - for standard input
        path: String,

        #[command(flatten)]
        filters: FilterOptions,
    },

    /// Show a colored summary of the planned changes
    Summary {
        /// Saved plan output, or - for standard input
        path: String,
    },
}

/// Install the stderr log subscriber; stdout carries command output only
fn init_logging(verbose: bool) {
    let default_level = if verbose { "tfplan=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resources { path } => {
            ResourcesCommand::execute(&path, cli.pretty)?;
        }
        Commands::Before { path, filters } => {
            ProjectCommand::execute(&path, ProjectionSide::Before, &filters, cli.pretty)?;
        }
        Commands::After { path, filters } => {
            ProjectCommand::execute(&path, ProjectionSide::After, &filters, cli.pretty)?;
        }
        Commands::Summary { path } => {
            SummaryCommand::execute(&path)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        output::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
