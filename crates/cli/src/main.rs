//! Txcost CLI - transaction cost lookup from the command line
//!
//! Usage:
//! ```bash
//! txcost init
//! txcost lookup --channel 81 --document-type CED --document-number 8-111-111 \
//!     --country PA --concept COBPER
//! txcost trail TXN123456 --verify
//! txcost status
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod db;

use commands::{lookup, trail};

/// Txcost - transaction cost lookup with an audited trail
#[derive(Parser)]
#[command(name = "txcost")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = "data/txcost.db", global = true)]
    pub db: PathBuf,

    /// Service configuration (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database with schema and seed data
    Init {
        /// Force re-initialization (drops existing data)
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,

    /// Look up the cost of a transaction
    Lookup(lookup::LookupArgs),

    /// Show the audit trail of a transaction
    Trail {
        /// Transaction ID
        transaction_id: String,
        /// Recompute payload hashes and report mismatches
        #[arg(long)]
        verify: bool,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    // Ensure data directory exists
    if let Some(parent) = cli.db.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    match cli.command {
        Commands::Init { force } => {
            db::init_database(&cli.db, force).await?;
            println!("✅ Database initialized at {:?}", cli.db);
        }

        Commands::Status => {
            db::show_status(&cli.db).await?;
        }

        Commands::Lookup(args) => {
            let config = db::load_config(cli.config.as_deref())?;
            lookup::run(&cli.db, config, args).await?;
        }

        Commands::Trail {
            transaction_id,
            verify,
            json,
        } => {
            trail::show(&cli.db, &transaction_id, verify, json).await?;
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
