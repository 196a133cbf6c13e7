//! Scope command
//!
//! Usage: lazycols scope --db <PATH> --table <TABLE> [--lazy <COL>]...

use super::declare::{declare, ModelArgs};
use clap::Args;
use lazycols_core::Projection;
use lazycols_store::{db, ModelRepo};

#[derive(Debug, Args)]
pub struct ScopeArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

/// Execute scope command
pub fn execute(args: ScopeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = db::open(&args.model.db)?;
    let repo = ModelRepo::with_global(&conn);
    let schema = declare(&args.model, repo.backend())?;

    match repo.registry().default_projection(&schema) {
        Projection::All => println!("{}.*", schema.table()),
        Projection::Columns(columns) => {
            for column in columns {
                println!("{}", column);
            }
        }
    }

    Ok(())
}
