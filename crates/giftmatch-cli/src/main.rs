//! giftmatch CLI
//!
//! Draw a gift exchange assignment from a JSON description of the
//! participants and exclusions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

/// giftmatch: exclusion-aware gift exchange assignments
#[derive(Parser)]
#[command(name = "giftmatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Engine config file (JSON)
    #[arg(short, long, global = true, env = "GIFTMATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw an assignment and print every giver's recipient
    Assign {
        /// Exchange file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Seed for a reproducible draw
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Report whether a valid assignment exists, without drawing one
    Check {
        /// Exchange file (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Assign {
            input,
            seed,
            format,
        } => commands::assign::run(&input, seed, format, cli.config),
        Commands::Check { input } => commands::check::run(&input, cli.config),
    }
}
