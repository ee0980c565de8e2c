//! Crafteo CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! crafteo migrate
//!
//! # Seed the database with a starter catalog and inventory
//! crafteo seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations (shared storefront/admin database)
//! - `seed` - Insert a demo catalog, materials and shipping zones

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "crafteo")]
#[command(author, version, about = "Crafteo CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo data (idempotent-ish; refuses a
    /// non-empty catalog unless --force)
    Seed {
        /// Seed even if products already exist
        #[arg(long)]
        force: bool,
    },
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
        Commands::Seed { force } => commands::seed::run(force).await?,
    }
    Ok(())
}
