//! Axleworks CLI - Database migrations and index management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! axle-cli migrate
//!
//! # Seed reference taxonomy and a demo catalog
//! axle-cli seed
//!
//! # Rebuild the search index from current relational state
//! axle-cli sync
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with reference data
//! - `sync` - Full search index rebuild (operator sync trigger)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "axle-cli")]
#[command(author, version, about = "Axleworks CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with reference taxonomy and a demo catalog
    Seed,
    /// Rebuild the search index from current relational state
    Sync,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Sync => commands::sync::run().await?,
    }
    Ok(())
}
