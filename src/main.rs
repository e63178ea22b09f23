use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docindex::Result;
use docindex::commands::{run_ingest, show_config};

#[derive(Parser)]
#[command(name = "docindex")]
#[command(about = "Page-aware PDF chunking and vector search indexing")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved configuration
    Config,
    /// Chunk, embed, and upload PDF files from a directory
    Ingest {
        /// Directory containing PDF files
        dir: PathBuf,
        /// Chunk and report without calling any external service
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config => {
            show_config(&cli.config_dir)?;
        }
        Commands::Ingest { dir, dry_run } => {
            run_ingest(&cli.config_dir, &dir, dry_run)?;
        }
    }

    Ok(())
}
