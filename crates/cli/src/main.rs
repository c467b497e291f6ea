//! Storelane CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! storelane migrate
//!
//! # Seed the default plan catalog
//! storelane seed plans
//!
//! # Hard-delete a store and everything in it
//! storelane store delete --id 42 --yes
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed plans` - Insert the default plan tiers
//! - `store delete` - Hard-delete a store (cascades catalog and orders)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "storelane")]
#[command(author, version, about = "Storelane CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the default plan tiers (skips existing names)
    Plans,
}

#[derive(Subcommand)]
enum StoreAction {
    /// Hard-delete a store, its catalog, and its orders
    Delete {
        /// Store id
        #[arg(short, long)]
        id: i32,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
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
        Commands::Seed { target } => match target {
            SeedTarget::Plans => commands::seed::plans().await?,
        },
        Commands::Store { action } => match action {
            StoreAction::Delete { id, yes } => {
                commands::store::delete(id, yes).await?;
            }
        },
    }
    Ok(())
}
