use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use colloquy_core::ColloquyConfig;
use colloquy_interaction::DifyClient;

mod commands;

#[derive(Parser)]
#[command(name = "colloquy")]
#[command(about = "Colloquy - human-in-the-loop reply review for AI chat", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "colloquy.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive review conversation
    Chat,
    /// Generate marketing copy from a prompt
    Copy {
        /// The copy-generation prompt
        prompt: String,
        /// Write the draft to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Probe the AI backend connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ColloquyConfig::load(Some(cli.config.as_path()))?;
    let backend = Arc::new(DifyClient::new(&config.backend)?);

    match cli.command {
        Commands::Chat => commands::chat::run(backend, config.chat).await,
        Commands::Copy { prompt, output } => {
            commands::copy::run(backend, &prompt, output.as_deref()).await
        }
        Commands::Check => commands::check::run(backend).await,
    }
}
