//! Buffet Simone CLI - Database migrations and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the documents table and the session table
//! bs-cli migrate
//!
//! # Load the bundled menu, replacing what is there
//! bs-cli seed menu crates/cli/seed/menu.yaml --clear
//!
//! # Inspect or wipe the local photo store
//! bs-cli photos list
//! bs-cli photos reset --dir data/local
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed menu` - Seed dish categories and dishes from YAML
//! - `photos` - Local photo store maintenance

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bs-cli")]
#[command(author, version, about = "Buffet Simone CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the document store
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Inspect or reset the local photo store
    Photos {
        #[command(subcommand)]
        action: PhotosAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed dish categories and dishes
    Menu {
        /// Path to the menu YAML file
        file: PathBuf,

        /// Delete existing dishes and categories first
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum PhotosAction {
    /// List stored photos and photo categories
    List {
        /// Local store directory (default: `LOCAL_STORE_DIR` or data/local)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Delete every photo and photo category
    Reset {
        /// Local store directory (default: `LOCAL_STORE_DIR` or data/local)
        #[arg(short, long)]
        dir: Option<PathBuf>,
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
            SeedTarget::Menu { file, clear } => commands::seed::menu(&file, clear).await?,
        },
        Commands::Photos { action } => match action {
            PhotosAction::List { dir } => commands::photos::list(dir).await?,
            PhotosAction::Reset { dir } => commands::photos::reset(dir).await?,
        },
    }
    Ok(())
}
