//! lazycols CLI
//!
//! Inspect how records load when some of their columns are lazy

use clap::{Parser, Subcommand};
use lazycols_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "lazycols")]
#[command(about = "lazycols - lazy column loading over SQLite", long_about = None)]
struct Cli {
    /// Human-readable debug logs on stderr instead of JSON info logs
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load one record through its default scope and read columns on demand
    Show(commands::show::ShowArgs),
    /// Print a model's default projection
    Scope(commands::scope::ScopeArgs),
}

fn main() {
    let cli = Cli::parse();

    let profile = if cli.verbose {
        Profile::Development
    } else {
        Profile::Production
    };
    logging_facility::init(profile);

    let result = match cli.command {
        Commands::Show(args) => commands::show::execute(args),
        Commands::Scope(args) => commands::scope::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
