//! Trowel CLI
//!
//! Command-line tools for the Trowel sync server.
//!
//! # Commands
//!
//! - `serve` - Run the sync server over a trench root directory
//! - `init` - Provision a new trench
//! - `inspect` - Display a trench's head and contents

mod commands;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Trowel sync server tools.
#[derive(Parser)]
#[command(name = "trowel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding one subdirectory per trench
    #[arg(global = true, short, long, default_value = "trenches")]
    root: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sync server
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "127.0.0.1:4571")]
        bind: SocketAddr,
    },

    /// Provision a new trench
    Init {
        /// Trench name
        trench: String,
    },

    /// Display a trench's head and contents
    Inspect {
        /// Trench name
        trench: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve { bind } => commands::serve::run(&cli.root, bind)?,
        Commands::Init { trench } => commands::init::run(&cli.root, &trench)?,
        Commands::Inspect { trench } => commands::inspect::run(&cli.root, &trench)?,
    }

    Ok(())
}
